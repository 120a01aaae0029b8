use crate::error::AppError;
use crate::model::{Counts, Task};

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxCelebrator;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsCelebrator;

/// How long the celebration stays on screen.
pub const CELEBRATION_MILLIS: u32 = 800;

const DISABLE_ENV_VAR: &str = "CUTE_TASKS_DISABLE_NOTIFICATIONS";

/// True when there is at least one task and every task is completed.
pub fn should_celebrate(tasks: &[Task]) -> bool {
    !tasks.is_empty() && tasks.iter().all(|task| task.completed)
}

pub trait Celebrator {
    fn celebrate(&self, counts: &Counts) -> Result<(), AppError>;
}

pub struct NoopCelebrator;

impl Celebrator for NoopCelebrator {
    fn celebrate(&self, _counts: &Counts) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn celebration_message(counts: &Counts) -> String {
    match counts.completed {
        1 => "All done! Your only task is complete.".to_string(),
        n => format!("All done! {n} tasks complete."),
    }
}

pub fn celebrator_from_env() -> Box<dyn Celebrator> {
    if std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Box::new(NoopCelebrator);
    }

    match platform_celebrator() {
        Ok(celebrator) => celebrator,
        Err(err) => {
            log::debug!("desktop celebration unavailable: {err}");
            Box::new(NoopCelebrator)
        }
    }
}

#[cfg(target_os = "linux")]
pub fn platform_celebrator() -> Result<Box<dyn Celebrator>, AppError> {
    Ok(Box::new(LinuxCelebrator))
}

#[cfg(windows)]
pub fn platform_celebrator() -> Result<Box<dyn Celebrator>, AppError> {
    Ok(Box::new(WindowsCelebrator))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_celebrator() -> Result<Box<dyn Celebrator>, AppError> {
    Err(AppError::invalid_data(
        "desktop notifications are not supported on this platform",
    ))
}
