use crate::{ActivationContext, ActivationError, FakeBackend};

const ERROR_INVALID_PARAMETER: u32 = 87;

fn initialized() -> (ActivationContext<FakeBackend>, FakeBackend) {
    let backend = FakeBackend::new();
    let observer = backend.clone();
    let mut ctx = ActivationContext::new("webkit.manifest", backend);
    ctx.initialize().unwrap();
    (ctx, observer)
}

#[test]
fn test_scope_deactivates_on_drop() {
    let (mut ctx, backend) = initialized();

    {
        let scope = ctx.scope().unwrap();
        assert!(scope.owns_activation());
        assert!(scope.context().is_activated());
        assert_eq!(backend.stack_depth(), 1);
    }

    assert!(!ctx.is_activated());
    assert_eq!(backend.stack_depth(), 0);
}

#[test]
fn test_scope_requires_initialize() {
    let backend = FakeBackend::new();
    let mut ctx = ActivationContext::new("webkit.manifest", backend.clone());

    let err = ctx.scope().err().unwrap();
    assert!(err.is_invalid_state());
    assert_eq!(backend.total_calls(), 0);
}

#[test]
fn test_scope_leaves_existing_activation() {
    let (mut ctx, backend) = initialized();
    ctx.activate().unwrap();

    let scope = ctx.scope().unwrap();
    assert!(!scope.owns_activation());
    scope.exit().unwrap();

    assert!(ctx.is_activated());
    assert_eq!(backend.deactivate_calls(), 0);
}

#[test]
fn test_scope_exit_reports_failure() {
    let (mut ctx, backend) = initialized();

    let scope = ctx.scope().unwrap();
    backend.fail_deactivate(Some(ERROR_INVALID_PARAMETER));
    let err = scope.exit().unwrap_err();

    assert!(matches!(err, ActivationError::DeactivateFailed { .. }));
    assert!(!ctx.is_activated());
    assert_eq!(backend.deactivate_calls(), 1);
}

#[test]
fn test_run_activates_around_closure() {
    let (mut ctx, backend) = initialized();
    let observer = backend.clone();

    let depth = ctx.run(|| observer.stack_depth()).unwrap();

    assert_eq!(depth, 1);
    assert_eq!(backend.stack_depth(), 0);
    assert!(!ctx.is_activated());
}

#[test]
fn test_run_deactivates_after_panic() {
    let (mut ctx, backend) = initialized();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _: Result<(), _> = ctx.run(|| panic!("COM object creation failed"));
    }));

    assert!(result.is_err());
    assert_eq!(backend.stack_depth(), 0);
    assert!(!ctx.is_activated());
}
