use serde::{Deserialize, Serialize};
use serde_json::Value;

// ==================================================================================================
// Relay request/response models
// ==================================================================================================

/// Query string of `GET /` (OAuth redirect target)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeQuery {
    pub code: Option<String>,
}

/// Body of `POST /register-meeting`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMeetingRequest {
    pub meeting_name: String,
    pub selected_date_time: String,
}

/// Successful relay response wrapping the upstream JSON
#[derive(Debug, Clone, Serialize)]
pub struct RelayResponse {
    pub data: Value,
    pub message: &'static str,
}

impl RelayResponse {
    pub fn meetings(data: Value) -> Self {
        Self {
            data,
            message: "Fetching meetings success",
        }
    }

    pub fn meeting_created(data: Value) -> Self {
        Self {
            data,
            message: "Meeting generated successfully",
        }
    }
}

// ==================================================================================================
// Zoom API models (POST /v2/users/me/meetings)
// ==================================================================================================

/// Scheduled meeting type in the Zoom API
pub const SCHEDULED_MEETING: u8 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateMeetingPayload {
    pub topic: String,
    pub start_time: String,
    #[serde(rename = "type")]
    pub meeting_type: u8,
    pub duration: u32,
    pub timezone: String,
    pub agenda: String,
    pub settings: MeetingSettings,
}

impl CreateMeetingPayload {
    /// Build the payload for a meeting registered through the relay
    pub fn from_request(request: &RegisterMeetingRequest) -> Self {
        Self {
            topic: request.meeting_name.clone(),
            start_time: request.selected_date_time.clone(),
            meeting_type: SCHEDULED_MEETING,
            duration: 45,
            timezone: "UST".to_string(),
            agenda: "TEST FOR ZOOM SDK".to_string(),
            settings: MeetingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeetingSettings {
    pub host_video: bool,
    pub participant_video: bool,
    pub join_before_host: bool,
    pub mute_upon_entry: bool,
    pub watermark: bool,
    pub use_pmi: bool,
    pub approval_type: u8,
    pub audio: String,
    pub auto_recording: String,
}

impl Default for MeetingSettings {
    fn default() -> Self {
        Self {
            host_video: true,
            participant_video: true,
            join_before_host: false,
            mute_upon_entry: true,
            watermark: false,
            use_pmi: false,
            approval_type: 0,
            audio: "both".to_string(),
            auto_recording: "none".to_string(),
        }
    }
}
