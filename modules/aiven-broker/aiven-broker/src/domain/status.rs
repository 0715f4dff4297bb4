use aiven_broker_sdk::{LastOperation, LastOperationState};

use crate::aiven::ServiceStatus;

/// Maps an Aiven service state onto the Open Service Broker operation state.
pub fn translate_status(status: &ServiceStatus) -> LastOperation {
    let (state, description) = match status {
        ServiceStatus::Running => (LastOperationState::Succeeded, "Last operation succeeded".to_owned()),
        ServiceStatus::Rebuilding => (LastOperationState::InProgress, "Rebuilding".to_owned()),
        ServiceStatus::Rebalancing => (LastOperationState::InProgress, "Rebalancing".to_owned()),
        ServiceStatus::PowerOff => (
            LastOperationState::Failed,
            "Last operation failed: service is powered off".to_owned(),
        ),
        ServiceStatus::Other(raw) => (LastOperationState::InProgress, format!("Unknown state: {raw}")),
    };
    LastOperation { state, description }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(raw: &str) -> LastOperation {
        translate_status(&ServiceStatus::from(raw.to_owned()))
    }

    #[test]
    fn translation_table() {
        let cases = [
            ("RUNNING", LastOperationState::Succeeded, "Last operation succeeded"),
            ("REBUILDING", LastOperationState::InProgress, "Rebuilding"),
            ("REBALANCING", LastOperationState::InProgress, "Rebalancing"),
            (
                "POWEROFF",
                LastOperationState::Failed,
                "Last operation failed: service is powered off",
            ),
        ];
        for (raw, state, description) in cases {
            let op = translate(raw);
            assert_eq!(op.state, state, "state for {raw}");
            assert_eq!(op.description, description, "description for {raw}");
        }
    }

    #[test]
    fn unknown_state_is_in_progress_with_raw_value() {
        let op = translate("REBOOTING");
        assert_eq!(op.state, LastOperationState::InProgress);
        assert_eq!(op.description, "Unknown state: REBOOTING");
    }
}
