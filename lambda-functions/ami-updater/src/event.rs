//! The ECS AMI release message published on the ECS AMI SNS topic.
//!
//! ```text
//! {"ECSAgent": {...}, "ECSAmis": [{"OsType": "linux", "Regions": {...}}, ...]}
//! ```

use std::collections::HashMap;

use aws_lambda_events::event::sns::SnsEvent;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AmiUpdaterError, Result};

pub const TARGET_OS_TYPE: &str = "linux";
pub const TARGET_OS_NAME: &str = "Amazon Linux";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AmiRelease {
    #[serde(rename = "ECSAgent", default, skip_serializing_if = "Option::is_none")]
    pub ecs_agent: Option<EcsAgent>,
    #[serde(rename = "ECSAmis")]
    pub ecs_amis: Vec<AmiSet>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct EcsAgent {
    pub release_version: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AmiSet {
    pub os_type: String,
    pub operating_system_name: String,
    #[serde(default)]
    pub release_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
    pub regions: HashMap<String, RegionAmi>,
}

impl AmiSet {
    pub fn is_target_os(&self) -> bool {
        self.os_type == TARGET_OS_TYPE && self.operating_system_name == TARGET_OS_NAME
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RegionAmi {
    pub image_id: String,
    pub name: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SelectedAmi {
    pub image_id: String,
    pub name: String,
}

impl AmiRelease {
    /// Decodes the release message embedded in the first SNS record.
    pub fn from_event(event: &SnsEvent) -> Result<Self> {
        let record = event
            .records
            .first()
            .ok_or_else(|| AmiUpdaterError::Parse("SNS event has no records".to_string()))?;

        serde_json::from_str(&record.sns.message)
            .map_err(|e| AmiUpdaterError::Parse(format!("invalid AMI release message: {e}")))
    }

    /// Picks the Amazon Linux AMI for `region`. Later matching sets replace
    /// earlier ones. A matching set without `region` is an error.
    pub fn select_for_region(&self, region: &str) -> Result<Option<SelectedAmi>> {
        let mut selected = None;

        for ami_set in &self.ecs_amis {
            if !ami_set.is_target_os() {
                info!(
                    os_type = %ami_set.os_type,
                    os_name = %ami_set.operating_system_name,
                    "Skipping AMI for {}",
                    ami_set.operating_system_name
                );
                continue;
            }

            let region_ami =
                ami_set
                    .regions
                    .get(region)
                    .ok_or_else(|| AmiUpdaterError::MissingRegion {
                        region: region.to_string(),
                        os_name: ami_set.operating_system_name.clone(),
                        release_version: ami_set.release_version.clone(),
                    })?;

            selected = Some(SelectedAmi {
                image_id: region_ami.image_id.clone(),
                name: region_ami.name.clone(),
            });
        }

        Ok(selected)
    }
}

/// A complete Lambda SNS record carrying `message`, shaped like the events
/// SNS delivers to Lambda.
#[cfg(test)]
pub(crate) fn test_sns_event(message: &str) -> SnsEvent {
    serde_json::from_value(serde_json::json!({
        "Records": [{
            "EventVersion": "1.0",
            "EventSubscriptionArn": "arn:aws:sns:us-east-1:123456789012:ecs-ami-updates:2bcfbf39-05c3-41de-beaa-fcfcc21c8f55",
            "EventSource": "aws:sns",
            "Sns": {
                "SignatureVersion": "1",
                "Timestamp": "2018-01-26T19:38:53.000Z",
                "Signature": "EXAMPLE",
                "SigningCertUrl": "https://sns.us-east-1.amazonaws.com/SimpleNotificationService.pem",
                "MessageId": "95df01b4-ee98-5cb9-9903-4c221d41eb5e",
                "Message": message,
                "MessageAttributes": {},
                "Type": "Notification",
                "UnsubscribeUrl": "https://sns.us-east-1.amazonaws.com/?Action=Unsubscribe",
                "TopicArn": "arn:aws:sns:us-east-1:123456789012:ecs-ami-updates",
                "Subject": null
            }
        }]
    }))
    .unwrap()
}
