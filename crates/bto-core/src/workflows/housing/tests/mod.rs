mod common;

mod application;
