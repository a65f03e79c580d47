use serde_json::json;
use strum::{AsRefStr, EnumString};

use super::Harness;
use super::error::Result;
use crate::db::seed::fixtures::{DEMO_APP_ID, NO_ACCESS_CHANNEL, SEEDED_DEVICE_ID};

const INVALID_APP_ID: &str = "invalid_app";
const INVALID_DEVICE_ID: &str = "invalid_device";
const TEST_DEVICE_ID: &str = "test_device";

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Scenario {
    LinkDevice,
    LinkInvalidApp,
    ListDevices,
    GetSpecificDevice,
    ListInvalidApp,
    GetInvalidDevice,
    UnlinkDevice,
    UnlinkInvalidDevice,
}

impl Scenario {
    pub const ALL: [Scenario; 8] = [
        Scenario::LinkDevice,
        Scenario::LinkInvalidApp,
        Scenario::ListDevices,
        Scenario::GetSpecificDevice,
        Scenario::ListInvalidApp,
        Scenario::GetInvalidDevice,
        Scenario::UnlinkDevice,
        Scenario::UnlinkInvalidDevice,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Scenario::LinkDevice => "POST /device - Link device",
            Scenario::LinkInvalidApp => "POST /device - Invalid app_id",
            Scenario::ListDevices => "GET /device - Get devices",
            Scenario::GetSpecificDevice => "GET /device - Get specific device",
            Scenario::ListInvalidApp => "GET /device - Invalid app_id",
            Scenario::GetInvalidDevice => "GET /device - Invalid device_id",
            Scenario::UnlinkDevice => "DELETE /device - Unlink device",
            Scenario::UnlinkInvalidDevice => "DELETE /device - Invalid device_id",
        }
    }

    /// Reset fixtures, then issue this scenario's single request and check it.
    pub async fn run(self, harness: &Harness) -> Result<()> {
        harness.fixtures.reset().await?;

        let api = &harness.api;
        match self {
            Scenario::LinkDevice => {
                let resp = api
                    .post(&json!({
                        "app_id": DEMO_APP_ID,
                        "device_id": TEST_DEVICE_ID,
                        "version_id": "1.0.0",
                        "channel": NO_ACCESS_CHANNEL,
                    }))
                    .await?;
                resp.expect_status(200)?;
                resp.expect_field("status", "ok")
            }
            Scenario::LinkInvalidApp => {
                let resp = api
                    .post(&json!({
                        "app_id": INVALID_APP_ID,
                        "device_id": TEST_DEVICE_ID,
                    }))
                    .await?;
                resp.expect_status(400)
            }
            Scenario::ListDevices => {
                let resp = api.get(&[("app_id", DEMO_APP_ID), ("api", "v2")]).await?;
                resp.expect_status(200)?;
                resp.expect_array().map(|_| ())
            }
            Scenario::GetSpecificDevice => {
                let resp = api
                    .get(&[
                        ("app_id", DEMO_APP_ID),
                        ("device_id", SEEDED_DEVICE_ID),
                        ("api", "v2"),
                    ])
                    .await?;
                resp.expect_status(200)?;
                resp.expect_field("device_id", SEEDED_DEVICE_ID)
            }
            Scenario::ListInvalidApp => {
                let resp = api.get(&[("app_id", INVALID_APP_ID), ("api", "v2")]).await?;
                resp.expect_status(400)
            }
            Scenario::GetInvalidDevice => {
                let resp = api
                    .get(&[("app_id", DEMO_APP_ID), ("device_id", INVALID_DEVICE_ID)])
                    .await?;
                resp.expect_status(400)
            }
            Scenario::UnlinkDevice => {
                let resp = api
                    .delete(&json!({ "device_id": TEST_DEVICE_ID, "app_id": DEMO_APP_ID }))
                    .await?;
                resp.expect_status(200)?;
                resp.expect_field("status", "ok")
            }
            Scenario::UnlinkInvalidDevice => {
                let resp = api
                    .delete(&json!({ "device_id": INVALID_DEVICE_ID, "app_id": DEMO_APP_ID }))
                    .await?;
                resp.expect_status(200)?;
                resp.expect_field("status", "ok")
            }
        }
    }
}
