//! Tests for startup orchestration.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::config::LaunchConfig;
    use crate::platform::simulated::{CameraBehavior, PlatformCall, SimulatedPlatform};
    use crate::platform::{PermissionOutcome, Platform, PlatformError};
    use crate::startup::{
        StartupOrchestrator, StartupPhase, StartupPlan, StartupStep, StepDetail, StepError,
        StepId, StepStatus,
    };

    fn orchestrator(platform: &Arc<SimulatedPlatform>) -> StartupOrchestrator {
        StartupOrchestrator::new(Platform::from_shared(platform.clone()))
    }

    fn config(key: Option<&str>, ar: bool, camera: bool) -> LaunchConfig {
        LaunchConfig {
            google_maps_key: key.map(str::to_string),
            enable_ar_check: ar,
            enable_camera_check: camera,
        }
    }

    async fn settle(report: &crate::startup::StartupReport) {
        tokio::time::timeout(Duration::from_secs(2), report.settled())
            .await
            .expect("camera outcome should arrive");
    }

    #[tokio::test]
    async fn test_scenario_empty_key_all_checks() {
        let platform = Arc::new(SimulatedPlatform::new().ar_supported(true));
        let report = orchestrator(&platform)
            .run_standard(&config(Some(""), true, true))
            .unwrap();
        settle(&report).await;

        assert!(report.status(StepId::RegisterPlugins).unwrap().is_success());
        assert_eq!(
            report.status(StepId::CheckArSupport).unwrap().detail(),
            Some(StepDetail::ArSupport(true))
        );
        assert_eq!(
            report.status(StepId::RequestCameraAccess).unwrap().detail(),
            Some(StepDetail::Permission(PermissionOutcome::Granted))
        );
        assert!(report.status(StepId::ProvisionMapsKey).unwrap().is_skipped());
        assert!(platform.provided_keys().is_empty());
        assert_eq!(report.phase(), StartupPhase::Completed);
    }

    #[tokio::test]
    async fn test_placeholder_key_matches_empty_key() {
        let platform = Arc::new(SimulatedPlatform::new());
        let orchestrator = orchestrator(&platform);

        let placeholder = orchestrator
            .run_standard(&config(Some("YOUR_GOOGLE_MAPS_API_KEY"), false, false))
            .unwrap();
        let empty = orchestrator
            .run_standard(&config(Some(""), false, false))
            .unwrap();

        assert_eq!(
            placeholder.status(StepId::ProvisionMapsKey),
            empty.status(StepId::ProvisionMapsKey)
        );
        assert!(placeholder
            .status(StepId::ProvisionMapsKey)
            .unwrap()
            .is_skipped());
        assert!(platform.provided_keys().is_empty());
    }

    #[test]
    fn test_absent_key_leaves_no_entry() {
        let platform = Arc::new(SimulatedPlatform::new());
        let report = orchestrator(&platform)
            .run_standard(&config(None, false, false))
            .unwrap();

        assert!(!report.contains(StepId::ProvisionMapsKey));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_configured_key_is_provided() {
        let platform = Arc::new(SimulatedPlatform::new());
        let report = orchestrator(&platform)
            .run_standard(&config(Some("AIzaKey"), false, false))
            .unwrap();

        assert!(report.status(StepId::ProvisionMapsKey).unwrap().is_success());
        assert_eq!(platform.provided_keys(), vec!["AIzaKey".to_string()]);
    }

    #[tokio::test]
    async fn test_rejected_key_does_not_stop_launch() {
        let platform = Arc::new(
            SimulatedPlatform::new()
                .rejecting_maps_key()
                .camera(CameraBehavior::Denied),
        );
        let report = orchestrator(&platform)
            .run_standard(&config(Some("AIzaKey"), true, true))
            .unwrap();
        settle(&report).await;

        assert!(report.status(StepId::ProvisionMapsKey).unwrap().is_failed());
        assert!(report.contains(StepId::CheckArSupport));
        assert!(report.contains(StepId::RequestCameraAccess));
        assert_eq!(report.phase(), StartupPhase::Completed);
    }

    #[tokio::test]
    async fn test_registration_failure_is_fatal() {
        let platform = Arc::new(
            SimulatedPlatform::new()
                .failing_registration("incompatible plugin state")
                .ar_supported(true),
        );
        let err = orchestrator(&platform)
            .run_standard(&config(Some("AIzaKey"), true, true))
            .unwrap_err();

        assert_eq!(err.step(), StepId::RegisterPlugins);
        assert!(matches!(
            err.cause(),
            StepError::Platform(PlatformError::Registration(_))
        ));
        assert_eq!(
            err.not_run(),
            &[
                StepId::ProvisionMapsKey,
                StepId::RequestCameraAccess,
                StepId::CheckArSupport,
            ]
        );

        let report = err.report();
        assert_eq!(report.len(), 1);
        assert!(report.status(StepId::RegisterPlugins).unwrap().is_failed());
        assert_eq!(report.phase(), StartupPhase::Fatal);
        assert_eq!(platform.calls(), vec![PlatformCall::RegisterPlugins]);
    }

    #[tokio::test]
    async fn test_registration_is_first_entry_and_first_call() {
        let platform = Arc::new(SimulatedPlatform::new());
        let report = orchestrator(&platform)
            .run_standard(&config(Some("AIzaKey"), true, true))
            .unwrap();
        settle(&report).await;

        let entries = report.entries();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].step, StepId::RegisterPlugins);
        assert_eq!(platform.calls()[0], PlatformCall::RegisterPlugins);
    }

    #[test]
    fn test_camera_disabled_leaves_no_entry() {
        let platform = Arc::new(SimulatedPlatform::new());
        let report = orchestrator(&platform)
            .run_standard(&config(Some(""), true, false))
            .unwrap();

        assert!(!report.contains(StepId::RequestCameraAccess));
        assert!(!platform.calls().contains(&PlatformCall::RequestCameraAccess));
    }

    #[test]
    fn test_ar_disabled_leaves_no_entry() {
        let platform = Arc::new(SimulatedPlatform::new());
        let report = orchestrator(&platform)
            .run_standard(&config(None, false, false))
            .unwrap();

        assert!(!report.contains(StepId::CheckArSupport));
        assert!(!platform.calls().contains(&PlatformCall::IsArSupported));
    }

    #[test]
    fn test_unsupported_ar_is_a_success() {
        let platform = Arc::new(SimulatedPlatform::new().ar_supported(false));
        let report = orchestrator(&platform)
            .run_standard(&config(None, true, false))
            .unwrap();

        let status = report.status(StepId::CheckArSupport).unwrap();
        assert!(status.is_success());
        assert_eq!(status.detail(), Some(StepDetail::ArSupport(false)));
        assert_eq!(report.phase(), StartupPhase::Completed);
    }

    #[tokio::test]
    async fn test_denied_camera_is_a_success() {
        let platform = Arc::new(SimulatedPlatform::new().camera(CameraBehavior::Denied));
        let report = orchestrator(&platform)
            .run_standard(&config(None, false, true))
            .unwrap();
        settle(&report).await;

        let status = report.status(StepId::RequestCameraAccess).unwrap();
        assert!(status.is_success());
        assert_eq!(
            status.detail(),
            Some(StepDetail::Permission(PermissionOutcome::Denied))
        );
    }

    #[tokio::test]
    async fn test_camera_mechanism_failures_are_failed() {
        for behavior in [CameraBehavior::Error, CameraBehavior::Dropped] {
            let platform = Arc::new(SimulatedPlatform::new().camera(behavior));
            let report = orchestrator(&platform)
                .run_standard(&config(None, false, true))
                .unwrap();
            settle(&report).await;

            assert!(
                report.status(StepId::RequestCameraAccess).unwrap().is_failed(),
                "{:?} should be recorded as failed",
                behavior
            );
        }
    }

    #[tokio::test]
    async fn test_run_does_not_wait_for_camera() {
        let platform = Arc::new(SimulatedPlatform::new().camera(CameraBehavior::Never));
        let report = tokio::time::timeout(
            Duration::from_secs(1),
            async { orchestrator(&platform).run_standard(&config(None, true, true)) },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(report.phase(), StartupPhase::Completed);
        assert_eq!(
            report.status(StepId::RequestCameraAccess),
            Some(StepStatus::Pending)
        );
        assert!(report.contains(StepId::CheckArSupport));

        let waited =
            tokio::time::timeout(Duration::from_millis(50), report.settled()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_late_camera_outcome_lands_after_run_returns() {
        let platform = Arc::new(
            SimulatedPlatform::new()
                .camera(CameraBehavior::Granted)
                .camera_delay(Duration::from_millis(30)),
        );
        let report = orchestrator(&platform)
            .run_standard(&config(None, false, true))
            .unwrap();
        assert_eq!(report.pending(), vec![StepId::RequestCameraAccess]);

        let status = tokio::time::timeout(
            Duration::from_secs(2),
            report.wait_for_step(StepId::RequestCameraAccess),
        )
        .await
        .unwrap()
        .unwrap();
        assert!(status.is_success());
        assert!(report.is_settled());
    }

    #[test]
    fn test_camera_outside_runtime_is_failed() {
        let platform = Arc::new(SimulatedPlatform::new());
        let report = orchestrator(&platform)
            .run_standard(&config(None, false, true))
            .unwrap();

        assert!(report.status(StepId::RequestCameraAccess).unwrap().is_failed());
        assert!(!platform.calls().contains(&PlatformCall::RequestCameraAccess));
    }

    #[test]
    fn test_run_twice_reexecutes_every_step() {
        let platform = Arc::new(SimulatedPlatform::new().ar_supported(false));
        let orchestrator = orchestrator(&platform);
        let launch = config(Some("AIzaKey"), true, false);

        let first = orchestrator.run_standard(&launch).unwrap();
        let second = orchestrator.run_standard(&launch).unwrap();

        assert_ne!(first.run_id(), second.run_id());
        assert_eq!(first.len(), second.len());
        let registrations = platform
            .calls()
            .into_iter()
            .filter(|call| *call == PlatformCall::RegisterPlugins)
            .count();
        assert_eq!(registrations, 2);
        assert_eq!(platform.provided_keys().len(), 2);
    }

    #[test]
    fn test_required_optional_step_becomes_fatal() {
        let platform = Arc::new(SimulatedPlatform::new().rejecting_maps_key());
        let mut maps = StartupStep::provision_maps_key();
        maps.required = true;
        let plan = StartupPlan::new(vec![
            StartupStep::register_plugins(),
            maps,
            StartupStep::check_ar_support(),
        ])
        .unwrap();

        let err = orchestrator(&platform)
            .run(&plan, &config(Some("AIzaKey"), true, false))
            .unwrap_err();
        assert_eq!(err.step(), StepId::ProvisionMapsKey);
        assert_eq!(err.not_run(), &[StepId::CheckArSupport]);
        assert_eq!(err.report().len(), 2);
    }

    #[test]
    fn test_custom_plan_order_is_followed() {
        let platform = Arc::new(SimulatedPlatform::new());
        let plan = StartupPlan::new(vec![
            StartupStep::register_plugins(),
            StartupStep::check_ar_support(),
            StartupStep::provision_maps_key(),
        ])
        .unwrap();

        orchestrator(&platform)
            .run(&plan, &config(Some("AIzaKey"), true, true))
            .unwrap();
        assert_eq!(
            platform.calls(),
            vec![
                PlatformCall::RegisterPlugins,
                PlatformCall::IsArSupported,
                PlatformCall::ProvideMapsKey("AIzaKey".to_string()),
            ]
        );
    }
}
