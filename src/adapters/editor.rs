use crate::engine::{Action, Notification, PlayRequest};
use crate::events::HostEvent;
use anyhow::Context;
use serde::Serialize;

pub fn parse_line(line: &str) -> anyhow::Result<Option<HostEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let event: HostEvent = serde_json::from_str(trimmed).context("parse host event")?;
    Ok(Some(event))
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Output<'a> {
    Play(&'a PlayRequest),
    Notification(&'a Notification),
    Status { text: &'a str },
}

impl<'a> From<&'a Action> for Output<'a> {
    fn from(action: &'a Action) -> Self {
        match action {
            Action::Play(request) => Output::Play(request),
            Action::Notification(notification) => Output::Notification(notification),
        }
    }
}

impl Output<'_> {
    pub fn to_line(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("encode host output")
    }
}
