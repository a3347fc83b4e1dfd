//! Default command: document a project

use std::io::IsTerminal;

use anyhow::Result;

use crate::cli::Cli;
use analyzer::ops::{document, DocumentOptions};
use analyzer::util::diagnostic::emit;
use analyzer::{AnalyzeError, GlobalContext};

pub fn execute(cli: Cli) -> Result<()> {
    let color = std::io::stderr().is_terminal();
    let ctx = GlobalContext::new(cli.project_dir)?;

    let result = match document(&ctx, &DocumentOptions::default()) {
        Ok(result) => result,
        Err(err) => {
            if let Some(analyze_err) = err.downcast_ref::<AnalyzeError>() {
                emit(&analyze_err.to_diagnostic(), color);
                std::process::exit(1);
            }
            return Err(err);
        }
    };

    for failure in &result.failures {
        emit(failure, color);
    }

    eprintln!(
        "  Documented {} workflow(s) -> {}",
        result.documented,
        result.output_path.display()
    );
    if !result.failures.is_empty() {
        eprintln!(
            "     Skipped {} workflow(s) that could not be analyzed",
            result.failures.len()
        );
    }

    Ok(())
}
