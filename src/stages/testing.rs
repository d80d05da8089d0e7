use crate::boundary::BoundaryWarning;
use crate::error::Result;
use crate::harness::TestHarness;

/// Run the test harness.
///
/// # Returns
/// * `Ok(None)` - tests ran and passed
/// * `Ok(Some(TestsSkipped))` - the harness has nothing to run
/// * `Err(TestFailed)` - tests failed; nothing may be tagged
pub fn run_tests<H: TestHarness + ?Sized>(harness: &H) -> Result<Option<BoundaryWarning>> {
    if harness.is_empty() {
        return Ok(Some(BoundaryWarning::TestsSkipped {
            reason: "no test command configured".to_string(),
        }));
    }

    harness.run()?;
    tracing::info!(command = %harness.describe(), "tests passed");
    Ok(None)
}
