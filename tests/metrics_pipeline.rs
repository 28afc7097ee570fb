//! Request latency instrumentation as seen through `/metrics`.

mod common;

fn assert_well_formed(exposition: &str) {
    for line in exposition.lines().filter(|l| !l.is_empty() && !l.starts_with('#')) {
        let (series, value) = line.rsplit_once(' ').unwrap_or_else(|| panic!("malformed: {line}"));
        assert!(!series.is_empty(), "missing series name: {line}");
        assert!(value.parse::<f64>().is_ok(), "bad sample value: {line}");
        if let Some(open) = series.find('{') {
            assert!(series.ends_with('}'), "unterminated labels: {line}");
            assert!(open > 0, "missing metric name: {line}");
        }
    }
}

#[tokio::test]
async fn test_each_request_observed_once() {
    let server = common::start_server(common::StubRemediator::succeeding("")).await;

    for _ in 0..3 {
        server.client.healthz().await.unwrap();
    }
    server.client.toggle_ready().await.unwrap();
    server.client.readyz().await.unwrap();
    server.client.work(Some(1)).await.unwrap();
    let res = server.http.get(server.url("/missing")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let exposition = server.client.metrics().await.unwrap();
    assert_well_formed(&exposition);

    assert_eq!(common::histogram_count(&exposition, "GET", "/healthz", "200"), 3);
    assert_eq!(common::histogram_count(&exposition, "POST", "/toggle-ready", "200"), 1);
    assert_eq!(common::histogram_count(&exposition, "GET", "/readyz", "503"), 1);
    assert_eq!(common::histogram_count(&exposition, "GET", "/work", "200"), 1);
    assert_eq!(common::histogram_count(&exposition, "GET", "/missing", "404"), 1);
    // The scrape in flight is not yet observed.
    assert_eq!(common::total_observations(&exposition), 7);
}

#[tokio::test]
async fn test_scrape_does_not_touch_other_series() {
    let server = common::start_server(common::StubRemediator::succeeding("")).await;
    server.client.healthz().await.unwrap();

    let first = server.client.metrics().await.unwrap();
    let second = server.client.metrics().await.unwrap();

    assert_eq!(common::histogram_count(&first, "GET", "/healthz", "200"), 1);
    assert_eq!(common::histogram_count(&second, "GET", "/healthz", "200"), 1);
    assert_eq!(common::histogram_count(&first, "GET", "/metrics", "200"), 0);
    assert_eq!(common::histogram_count(&second, "GET", "/metrics", "200"), 1);
}

#[tokio::test]
async fn test_route_label_uses_template_and_buckets() {
    let server = common::start_server(common::StubRemediator::succeeding("")).await;
    server.http.get(server.url("/work?ms=2")).send().await.unwrap();

    let exposition = server.client.metrics().await.unwrap();
    assert!(exposition.contains("# TYPE http_request_duration_seconds histogram"));
    assert!(!exposition.contains("route=\"/work?ms=2\""));
    for bound in [
        "0.005", "0.01", "0.025", "0.05", "0.1", "0.25", "0.5", "1", "2", "5", "+Inf",
    ] {
        let needle = format!("le=\"{bound}\"");
        assert!(
            exposition
                .lines()
                .any(|l| l.starts_with("http_request_duration_seconds_bucket{")
                    && l.contains("route=\"/work\"")
                    && l.contains(&needle)),
            "missing bucket {bound}"
        );
    }
}

#[tokio::test]
async fn test_method_not_allowed_is_observed() {
    let server = common::start_server(common::StubRemediator::succeeding("")).await;
    let res = server.http.post(server.url("/healthz")).send().await.unwrap();
    assert_eq!(res.status(), 405);

    let exposition = server.client.metrics().await.unwrap();
    assert_eq!(common::histogram_count(&exposition, "POST", "/healthz", "405"), 1);
}

#[tokio::test]
async fn test_exposition_content_type_and_gauges() {
    let server = common::start_server(common::StubRemediator::succeeding("")).await;

    let res = server.http.get(server.url("/metrics")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    assert!(content_type.contains("version=0.0.4"));

    let exposition = res.text().await.unwrap();
    assert_eq!(common::gauge_value(&exposition, "selfheal_ready"), Some(1.0));

    server.client.toggle_ready().await.unwrap();
    let exposition = server.client.metrics().await.unwrap();
    assert_eq!(common::gauge_value(&exposition, "selfheal_ready"), Some(0.0));
}
