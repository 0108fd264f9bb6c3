use std::fmt;
use std::str::FromStr;

use crate::mac::validate_mac_addr;
use crate::status::LinkDump;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnitionAction {
    Assoc,
    Dissoc,
}

impl IgnitionAction {
    pub const ALL: [IgnitionAction; 2] = [IgnitionAction::Assoc, IgnitionAction::Dissoc];

    pub fn name(&self) -> &'static str {
        match self {
            IgnitionAction::Assoc => "ASSOC",
            IgnitionAction::Dissoc => "DISSOC",
        }
    }

    /// Path segment used by the node API.
    pub fn endpoint(&self) -> &'static str {
        match self {
            IgnitionAction::Assoc => "assoc",
            IgnitionAction::Dissoc => "disassoc",
        }
    }

    /// "Assoc" / "Dissoc", for user messages.
    pub fn label(&self) -> &'static str {
        match self {
            IgnitionAction::Assoc => "Assoc",
            IgnitionAction::Dissoc => "Dissoc",
        }
    }

    /// Dissoc only makes sense while the node has links.
    pub fn is_available(&self, link_dump: &LinkDump) -> bool {
        match self {
            IgnitionAction::Assoc => true,
            IgnitionAction::Dissoc => link_dump.has_links(),
        }
    }
}

impl FromStr for IgnitionAction {
    type Err = IgnitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IgnitionAction::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s))
            .ok_or(IgnitionError::UnknownAction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnitionError {
    MissingField,
    InvalidMac,
    UnknownAction,
}

impl fmt::Display for IgnitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnitionError::MissingField => f.write_str("Please fill out all form fields."),
            IgnitionError::InvalidMac => f.write_str("Invalid MAC address format."),
            IgnitionError::UnknownAction => f.write_str("Internal error."),
        }
    }
}

impl std::error::Error for IgnitionError {}

/// A validated associate/disassociate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnitionRequest {
    pub action: IgnitionAction,
    pub initiator: String,
    pub responder: String,
}

impl IgnitionRequest {
    pub fn validate(
        action: Option<IgnitionAction>,
        initiator: Option<&str>,
        responder: Option<&str>,
    ) -> Result<Self, IgnitionError> {
        let (action, initiator, responder) = match (action, initiator, responder) {
            (Some(a), Some(i), Some(r)) if !i.is_empty() && !r.is_empty() => (a, i, r),
            _ => return Err(IgnitionError::MissingField),
        };

        if !validate_mac_addr(initiator) || !validate_mac_addr(responder) {
            return Err(IgnitionError::InvalidMac);
        }

        Ok(Self {
            action,
            initiator: initiator.to_string(),
            responder: responder.to_string(),
        })
    }

    pub fn sent_message(&self) -> String {
        format!("{} command was sent.", self.action.label())
    }

    pub fn failed_message(&self) -> String {
        format!("{} command returned an error.", self.action.label())
    }
}

/// Responders currently linked to `initiator`, the only valid dissoc targets.
pub fn dissoc_candidates<'a>(link_dump: &'a LinkDump, initiator: &str) -> Vec<&'a str> {
    link_dump
        .link_status_dump
        .iter()
        .filter(|(_, link)| link.radio_mac == initiator)
        .map(|(responder, _)| responder.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::LinkStatus;

    const INITIATOR: &str = "04:ce:14:fe:a5:2f";
    const RESPONDER: &str = "04:ce:14:fe:a5:99";

    #[test]
    fn test_validate_request() {
        let req = IgnitionRequest::validate(
            Some(IgnitionAction::Assoc),
            Some(INITIATOR),
            Some(RESPONDER),
        )
        .expect("valid request");

        assert_eq!(req.action.endpoint(), "assoc");
        assert_eq!(req.sent_message(), "Assoc command was sent.");
        assert_eq!(req.failed_message(), "Assoc command returned an error.");
    }

    #[test]
    fn test_missing_fields_before_format() {
        assert_eq!(
            IgnitionRequest::validate(None, Some(INITIATOR), Some(RESPONDER)),
            Err(IgnitionError::MissingField)
        );
        assert_eq!(
            IgnitionRequest::validate(Some(IgnitionAction::Dissoc), Some(""), Some("bogus")),
            Err(IgnitionError::MissingField)
        );
        assert_eq!(
            IgnitionRequest::validate(Some(IgnitionAction::Dissoc), Some(INITIATOR), Some("bogus")),
            Err(IgnitionError::InvalidMac)
        );
    }

    #[test]
    fn test_parse_action() {
        assert_eq!("dissoc".parse::<IgnitionAction>(), Ok(IgnitionAction::Dissoc));
        assert_eq!("ASSOC".parse::<IgnitionAction>(), Ok(IgnitionAction::Assoc));
        assert_eq!("disassoc".parse::<IgnitionAction>(), Err(IgnitionError::UnknownAction));
        assert_eq!(IgnitionAction::Dissoc.endpoint(), "disassoc");
    }

    #[test]
    fn test_dissoc_candidates() {
        let mut dump = LinkDump::default();
        assert!(!IgnitionAction::Dissoc.is_available(&dump));
        assert!(IgnitionAction::Assoc.is_available(&dump));

        let link = |radio: &str| LinkStatus {
            ifname: "terra0".to_string(),
            radio_mac: radio.to_string(),
            link_status_type: Some(1),
        };
        dump.link_status_dump.insert(RESPONDER.to_string(), link(INITIATOR));
        dump.link_status_dump.insert("04:ce:14:fe:a5:98".to_string(), link("04:ce:14:fe:a5:2e"));

        assert!(IgnitionAction::Dissoc.is_available(&dump));
        assert_eq!(dissoc_candidates(&dump, INITIATOR), vec![RESPONDER]);
        assert!(dissoc_candidates(&dump, RESPONDER).is_empty());
    }
}
