use std::path::PathBuf;

use actctx_core::{ActivationBackend, ActivationContext, ActivationError, Cookie};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProbeStep {
    pub step: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie: Option<Cookie>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_code: Option<u32>,
}

impl ProbeStep {
    fn from_result<T>(step: &'static str, result: &Result<T, ActivationError>) -> Self {
        match result {
            Ok(_) => Self {
                step,
                ok: true,
                cookie: None,
                error: None,
                os_code: None,
            },
            Err(e) => Self {
                step,
                ok: false,
                cookie: None,
                error: Some(e.to_string()),
                os_code: e.os_code(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub manifest: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<u16>,
    pub steps: Vec<ProbeStep>,
    /// State after the last step, before the context is released
    pub final_state: String,
}

impl ProbeReport {
    pub fn succeeded(&self) -> bool {
        self.steps.iter().all(|s| s.ok)
    }

    pub fn print_text(&self) {
        match self.resource_id {
            Some(id) => println!("manifest: {} (resource {id})", self.manifest.display()),
            None => println!("manifest: {}", self.manifest.display()),
        }
        for step in &self.steps {
            let status = if step.ok { "ok" } else { "FAILED" };
            match (&step.error, step.cookie) {
                (Some(error), _) => println!("  {:<12} {status}: {error}", step.step),
                (None, Some(cookie)) => println!("  {:<12} {status} (cookie {cookie})", step.step),
                (None, None) => println!("  {:<12} {status}", step.step),
            }
        }
        println!("final state: {}", self.final_state);
    }
}

/// Walk the context through initialize, activate and deactivate, stopping at
/// the first failure. The context is released when it goes out of scope.
pub fn probe<B: ActivationBackend>(mut context: ActivationContext<B>) -> ProbeReport {
    let descriptor = context.descriptor();
    tracing::info!(
        manifest = %descriptor.source().display(),
        resource_id = ?descriptor.resource_id(),
        "probing activation context"
    );

    let mut report = ProbeReport {
        manifest: descriptor.source().to_path_buf(),
        resource_id: descriptor.resource_id(),
        steps: Vec::new(),
        final_state: String::new(),
    };

    run_steps(&mut context, &mut report.steps);
    report.final_state = context.state().to_string();
    report
}

fn run_steps<B: ActivationBackend>(context: &mut ActivationContext<B>, steps: &mut Vec<ProbeStep>) {
    let initialized = context.initialize();
    steps.push(ProbeStep::from_result("initialize", &initialized));
    if initialized.is_err() {
        return;
    }

    let activated = context.activate();
    let mut step = ProbeStep::from_result("activate", &activated);
    step.cookie = context.cookie();
    steps.push(step);
    if activated.is_err() {
        return;
    }

    let deactivated = context.deactivate();
    steps.push(ProbeStep::from_result("deactivate", &deactivated));
}
