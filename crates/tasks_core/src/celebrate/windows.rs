use crate::celebrate::{Celebrator, celebration_message};
use crate::error::AppError;
use crate::model::Counts;
use tauri_winrt_notification::{Duration, Toast};

pub struct WindowsCelebrator;

impl Celebrator for WindowsCelebrator {
    fn celebrate(&self, counts: &Counts) -> Result<(), AppError> {
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title("cute tasks")
            .text1(&celebration_message(counts))
            .duration(Duration::Short)
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
