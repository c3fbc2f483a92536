//! Handler tests for the dashboard API

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use dashboard_core::DashboardService;
    use dashboard_engine::views::Scalar;
    use dashboard_engine::{
        CostClass, Dataset, Dispatcher, ResultKind, Selection, ViewDefinition, ViewResult,
        ViewStatus,
    };

    use crate::config::Config;
    use crate::handlers::{self, FilterQuery};
    use crate::{AppState, DashboardApi, Error};

    const CSV: &str = "Channel Grouping,Country,Date,Page Title,Device Category,Sessions,Bounces,Exits,Unique Pageviews,Page Load Time,Time on Page
Organic Search,Brazil,01/05/2019,Home,desktop,10,2,3,50,1.5,40
Organic Search,India,01/25/2019,Pricing,mobile,20,4,5,40,2.5,60
Direct,Brazil,02/11/2019,Home,mobile,5,1,1,30,3.0,20
";

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::from_reader(CSV.as_bytes()).unwrap())
    }

    fn config(view_wait: Duration) -> Config {
        Config {
            view_wait,
            warm_cache: false,
            ..Config::default()
        }
    }

    fn state_with_wait(view_wait: Duration) -> AppState {
        AppState::new(config(view_wait), Dispatcher::new(dataset()))
    }

    fn sleepy_rows(selection: &Selection<'_>) -> ViewResult {
        std::thread::sleep(Duration::from_millis(500));
        ViewResult::Scalar(Scalar::new(selection.len() as f64))
    }

    fn unparsable(_: &Selection<'_>) -> ViewResult {
        panic!("unexpected column type")
    }

    static SLEEPY: [ViewDefinition; 1] = [ViewDefinition {
        name: "sleepy-rows",
        title: "Sleepy Rows",
        kind: ResultKind::Scalar,
        cost: CostClass::Expensive,
        aggregate: sleepy_rows,
    }];

    static FAILING: [ViewDefinition; 1] = [ViewDefinition {
        name: "unparsable",
        title: "Unparsable",
        kind: ResultKind::Scalar,
        cost: CostClass::Expensive,
        aggregate: unparsable,
    }];

    fn state() -> AppState {
        state_with_wait(Duration::from_secs(5))
    }

    fn filter(value: &str) -> Query<FilterQuery> {
        Query(FilterQuery {
            filter: Some(value.to_string()),
        })
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.service.service_name, "dashboard-api");
        assert_eq!(config.view_wait, Duration::from_millis(2000));
        assert!(config.warm_cache);
        assert_eq!(config.dataset_path.to_str(), Some("./assets/data.csv"));
    }

    #[test]
    fn test_config_reads_logging_settings() {
        let config = Config::from_lookup(|key| match key {
            "JSON_LOGS" => Some("1".to_string()),
            "LOG_LEVEL" => Some("debug".to_string()),
            _ => None,
        })
        .unwrap();
        assert!(config.telemetry.json_logs);
        assert_eq!(config.telemetry.log_level, "debug");

        let text = Config::from_lookup(|key| (key == "JSON_LOGS").then(|| "false".to_string()))
            .unwrap();
        assert!(!text.telemetry.json_logs);
    }

    #[test]
    fn test_config_rejects_bad_wait() {
        let result = Config::from_lookup(|key| (key == "VIEW_WAIT_MS").then(|| "soon".to_string()));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_health() {
        let response = handlers::health(State(state())).await;
        assert_eq!(response.0.status, "healthy");
        assert_eq!(response.0.service, "dashboard-api");
    }

    #[tokio::test]
    async fn test_ready_reports_rows() {
        let response = handlers::ready(State(state())).await;
        assert!(response.0.ready);
        assert_eq!(response.0.rows, 3);
    }

    #[tokio::test]
    async fn test_filters_end_with_all() {
        let response = handlers::list_filters(State(state())).await;
        let options: Vec<&str> = response.0.options.iter().map(|f| f.as_str()).collect();
        assert_eq!(options, vec!["Organic Search", "Direct", "All"]);
        assert_eq!(response.0.default.as_str(), "All");
    }

    #[tokio::test]
    async fn test_list_views() {
        let response = handlers::list_views(State(state())).await;
        assert_eq!(response.0.views.len(), 12);
    }

    #[tokio::test]
    async fn test_dashboard_settles_all_views() {
        let state = state();
        let response = handlers::dashboard(State(state.clone()), filter("Organic Search")).await;

        assert_eq!(response.0.filter.as_str(), "Organic Search");
        assert_eq!(response.0.views.len(), 12);
        assert!(response.0.views.values().all(|status| matches!(status, ViewStatus::Ready { .. })));

        let stats = handlers::stats(State(state)).await;
        assert_eq!(stats.0.cache.computations, 2);
    }

    #[tokio::test]
    async fn test_dashboard_defaults_to_all() {
        let response =
            handlers::dashboard(State(state()), Query(FilterQuery::default())).await;
        assert_eq!(response.0.filter.as_str(), "All");

        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["views"]["total-sessions"]["status"], "ready");
        assert_eq!(json["views"]["total-sessions"]["result"]["value"], 35.0);
    }

    #[tokio::test]
    async fn test_dashboard_zero_wait_reports_submitted() {
        let dispatcher = Dispatcher::with_views(dataset(), &SLEEPY);
        let state = AppState::new(config(Duration::ZERO), dispatcher);

        let response = handlers::dashboard(State(state.clone()), filter("Direct")).await;
        assert_eq!(response.0.views["sleepy-rows"], ViewStatus::Submitted);

        let joined = handlers::dashboard(State(state), filter("Direct")).await;
        assert_eq!(joined.0.views["sleepy-rows"], ViewStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_view() {
        let response = handlers::get_view(
            State(state()),
            Path("top-5-countries-by-unique-pageviews".to_string()),
            filter("All"),
        )
        .await
        .unwrap();

        let chart = response.0.result.as_chart().unwrap();
        assert_eq!(chart.series[0].labels, vec!["Brazil", "India"]);
        assert_eq!(chart.series[0].values, vec![80.0, 40.0]);
    }

    #[tokio::test]
    async fn test_get_unknown_view_is_404() {
        let err = handlers::get_view(
            State(state()),
            Path("conversion-rate".to_string()),
            filter("All"),
        )
        .await
        .unwrap_err();

        assert!(matches!(&err, Error::ViewNotFound(name) if name == "conversion-rate"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_failed_view_is_500() {
        let dispatcher = Dispatcher::with_views(dataset(), &FAILING);
        let state = AppState::new(config(Duration::from_secs(5)), dispatcher);

        let err = handlers::get_view(State(state), Path("unparsable".to_string()), filter("All"))
            .await
            .unwrap_err();

        assert!(matches!(&err, Error::Computation(f) if f.reason == "unexpected column type"));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_view_echoes_requested_name() {
        let response = handlers::get_view(
            State(state()),
            Path("total-sessions".to_string()),
            filter("Direct"),
        )
        .await
        .unwrap();

        assert_eq!(response.0.view, "total-sessions");
        assert_eq!(response.0.result.as_scalar().and_then(|s| s.value), Some(5.0));
    }

    #[tokio::test]
    async fn test_view_status_lifecycle() {
        let state = state();
        let name = "top-5-pages-by-unique-pageviews".to_string();

        let before = handlers::view_status(State(state.clone()), Path(name.clone()), filter("Direct"))
            .await
            .unwrap();
        assert_eq!(before.0["status"], "none");
        assert_eq!(before.0["view"], name.as_str());

        handlers::get_view(State(state.clone()), Path(name.clone()), filter("Direct"))
            .await
            .unwrap();

        let after = handlers::view_status(State(state), Path(name), filter("Direct"))
            .await
            .unwrap();
        assert_eq!(after.0["status"], "ready");
        assert_eq!(after.0["filter"], "Direct");
    }

    #[tokio::test]
    async fn test_service_health_and_readiness() {
        let service = DashboardApi::new(state());
        let health = service.health().await;
        assert!(health.healthy);

        let ready = service.ready().await;
        assert!(ready.ready);
        assert_eq!(ready.dependencies[0].detail.as_deref(), Some("3 rows"));
    }

    #[test]
    fn test_warm_cache_submits_every_option() {
        let service = DashboardApi::new(state());
        tokio_test::block_on(async {
            service.warm_cache();
        });
        // Three options, two expensive views each
        assert_eq!(service.state.dispatcher.cache().len(), 6);
        // The runtime that ran them is gone, so none may stay in flight
        assert_eq!(service.state.dispatcher.cache().stats().in_flight, 0);
    }
}
