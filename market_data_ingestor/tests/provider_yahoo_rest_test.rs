use chrono::{TimeZone, Utc};
use market_data_ingestor::{
    models::{request_params::BarsRequestParams, timeframe::TimeFrame},
    providers::{DataProvider, ProviderError, yahoo_rest::YahooChartProvider},
};
use mockito::Matcher;

fn params(symbols: &[&str], timeframe: &str) -> BarsRequestParams {
    BarsRequestParams {
        symbols: symbols.iter().map(|s| s.to_string()).collect(),
        timeframe: timeframe.parse::<TimeFrame>().unwrap(),
        start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap(),
    }
}

fn chart_body(symbol: &str, first_ts: i64, closes: &[f64]) -> String {
    let timestamps: Vec<i64> = (0..closes.len() as i64).map(|i| first_ts + i * 900).collect();
    let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
    let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
    serde_json::json!({
        "chart": {
            "result": [{
                "meta": { "symbol": symbol },
                "timestamp": timestamps,
                "indicators": { "quote": [{
                    "open": closes,
                    "high": highs,
                    "low": lows,
                    "close": closes,
                    "volume": vec![100; closes.len()],
                }]}
            }],
            "error": null
        }
    })
    .to_string()
}

#[tokio::test]
async fn fetches_one_series_per_symbol_in_request_order() {
    let mut server = mockito::Server::new_async().await;
    let btc = server
        .mock("GET", "/v8/finance/chart/BTC-USD")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("interval".into(), "15m".into()),
            Matcher::UrlEncoded("period1".into(), "1704067200".into()),
            Matcher::UrlEncoded("period2".into(), "1704499200".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chart_body("BTC-USD", 1704067200, &[42000.0, 42100.0, 42050.0]))
        .create_async()
        .await;
    let gold = server
        .mock("GET", "/v8/finance/chart/GC=F")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chart_body("GC=F", 1704067200, &[2060.0, 2061.5]))
        .create_async()
        .await;

    let provider = YahooChartProvider::with_base_url(server.url()).unwrap();
    let series = provider
        .fetch_bars(params(&["BTC-USD", "GC=F"], "15m"))
        .await
        .expect("fetch");

    btc.assert_async().await;
    gold.assert_async().await;

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].symbol, "BTC-USD");
    assert_eq!(series[0].closes(), vec![42000.0, 42100.0, 42050.0]);
    assert!(series[0].is_strictly_increasing());
    assert_eq!(series[1].symbol, "GC=F");
    assert_eq!(series[1].bars[1].high, 2062.5);
    assert_eq!(series[1].timeframe.to_string(), "15m");
}

#[tokio::test]
async fn chart_error_payload_becomes_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/v8/finance/chart/NOPE")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#)
        .create_async()
        .await;

    let provider = YahooChartProvider::with_base_url(server.url()).unwrap();
    let err = provider.fetch_bars(params(&["NOPE"], "15m")).await.unwrap_err();
    match err {
        ProviderError::Api { message, .. } => {
            assert!(message.contains("Not Found"), "{message}");
            assert!(message.contains("NOPE"), "{message}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_server_error_is_reported_with_status() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/v8/finance/chart/BTC-USD")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_body("Too Many Requests")
        .create_async()
        .await;

    let provider = YahooChartProvider::with_base_url(server.url()).unwrap();
    let err = provider.fetch_bars(params(&["BTC-USD"], "15m")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Api { .. }));
    assert!(err.to_string().contains("429"), "{err}");
}

#[tokio::test]
async fn unsupported_interval_never_hits_the_network() {
    let mut server = mockito::Server::new_async().await;
    let m = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let provider = YahooChartProvider::with_base_url(server.url()).unwrap();
    let err = provider.fetch_bars(params(&["BTC-USD"], "4h")).await.unwrap_err();
    assert!(matches!(err, ProviderError::Validation { .. }));
    m.assert_async().await;
}

#[tokio::test]
async fn empty_range_yields_empty_series() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/v8/finance/chart/GC=F")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"chart":{"result":[{"meta":{"symbol":"GC=F"},"indicators":{"quote":[{}]}}],"error":null}}"#)
        .create_async()
        .await;

    let provider = YahooChartProvider::with_base_url(server.url()).unwrap();
    let series = provider.fetch_bars(params(&["GC=F"], "15m")).await.unwrap();
    assert_eq!(series.len(), 1);
    assert!(series[0].is_empty());
}
