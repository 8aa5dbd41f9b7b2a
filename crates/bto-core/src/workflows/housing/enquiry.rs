use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{EnquiryId, ProjectId, UserId};
use super::errors::StateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnquiryStatus {
    Pending,
    Replied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnquiryReply {
    pub text: String,
    pub replied_by: UserId,
    pub replied_on: NaiveDate,
}

/// A question an applicant raised about a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: EnquiryId,
    pub applicant: UserId,
    pub project: ProjectId,
    pub submitted_on: NaiveDate,
    text: String,
    reply: Option<EnquiryReply>,
}

impl Enquiry {
    pub(crate) fn new(
        id: EnquiryId,
        applicant: UserId,
        project: ProjectId,
        text: String,
        submitted_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            applicant,
            project,
            submitted_on,
            text,
            reply: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn reply(&self) -> Option<&EnquiryReply> {
        self.reply.as_ref()
    }

    pub fn status(&self) -> EnquiryStatus {
        if self.reply.is_some() {
            EnquiryStatus::Replied
        } else {
            EnquiryStatus::Pending
        }
    }

    pub fn edit(&mut self, text: String) -> Result<(), StateError> {
        self.expect_pending()?;
        self.text = text;
        Ok(())
    }

    pub fn answer(&mut self, reply: EnquiryReply) -> Result<(), StateError> {
        self.expect_pending()?;
        self.reply = Some(reply);
        Ok(())
    }

    fn expect_pending(&self) -> Result<(), StateError> {
        match self.status() {
            EnquiryStatus::Pending => Ok(()),
            EnquiryStatus::Replied => Err(StateError::EnquiryReplied(self.id.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enquiry() -> Enquiry {
        Enquiry::new(
            EnquiryId("ENQ-000001".to_string()),
            UserId("S1234567A".to_string()),
            ProjectId("ACACIA".to_string()),
            "Is there a carpark?".to_string(),
            NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date"),
        )
    }

    #[test]
    fn replied_enquiry_is_frozen() {
        let mut enquiry = enquiry();
        enquiry
            .answer(EnquiryReply {
                text: "Yes, multi-storey.".to_string(),
                replied_by: UserId("S5551234M".to_string()),
                replied_on: NaiveDate::from_ymd_opt(2026, 3, 3).expect("valid date"),
            })
            .expect("first reply");

        assert_eq!(enquiry.status(), EnquiryStatus::Replied);
        assert!(enquiry.edit("Never mind".to_string()).is_err());
        assert_eq!(enquiry.text(), "Is there a carpark?");
    }

    #[test]
    fn second_reply_is_refused() {
        let mut enquiry = enquiry();
        let reply = EnquiryReply {
            text: "Yes.".to_string(),
            replied_by: UserId("S5551234M".to_string()),
            replied_on: NaiveDate::from_ymd_opt(2026, 3, 3).expect("valid date"),
        };
        enquiry.answer(reply.clone()).expect("first reply");

        assert_eq!(
            enquiry.answer(reply),
            Err(StateError::EnquiryReplied(enquiry.id.clone()))
        );
    }
}
