//! Verification report and summary printing.

/// Outcome of one verification stage.
#[derive(Debug, Clone)]
pub struct StageResult {
    pub name: &'static str,
    pub passed: bool,
}

impl StageResult {
    pub fn new(name: &'static str, passed: bool) -> Self {
        Self { name, passed }
    }
}

/// All stages in run order. The overall verdict is the AND of every
/// stage; a single failure fails the run.
#[derive(Debug, Default)]
pub struct VerifyReport {
    pub stages: Vec<StageResult>,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.stages.iter().all(|s| s.passed)
    }

    pub fn failed_count(&self) -> usize {
        self.stages.iter().filter(|s| !s.passed).count()
    }

    fn stage_failed(&self, name: &str) -> bool {
        self.stages.iter().any(|s| s.name == name && !s.passed)
    }

    /// Print the per-stage verdict table and the closing advice block.
    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("📊 Summary");
        println!("{}", "=".repeat(60));

        for stage in &self.stages {
            let status = if stage.passed { "✅ PASS" } else { "❌ FAIL" };
            println!("{} - {}", status, stage.name);
        }

        println!("\n{}", "=".repeat(60));

        if self.passed() {
            println!("✅ All checks passed! The application is ready to use.");
            println!("\nTo start the application, run:");
            println!("  breachlab serve");
            println!("\nThen open your browser to: http://127.0.0.1:5000");
        } else {
            println!("⚠️  {} check(s) failed.", self.failed_count());
            println!("\nPlease fix the issues above before running the application.");

            if self.stage_failed("Dependencies") {
                println!("\nTo fetch dependencies:");
                println!("  cargo fetch");
            }

            if self.stage_failed("Database") {
                println!("\nTo initialize the database:");
                println!("  breachlab init-db");
            }
        }

        println!("{}", "=".repeat(60));
    }
}
