use crate::celebrate::{CELEBRATION_MILLIS, Celebrator, celebration_message};
use crate::error::AppError;
use crate::model::Counts;
use notify_rust::{Notification, Timeout};

pub struct LinuxCelebrator;

impl Celebrator for LinuxCelebrator {
    fn celebrate(&self, counts: &Counts) -> Result<(), AppError> {
        Notification::new()
            .summary("cute tasks")
            .body(&celebration_message(counts))
            .timeout(Timeout::Milliseconds(CELEBRATION_MILLIS))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
