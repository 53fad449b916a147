//! End-to-end routing tests over the fixture catalogue.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use charmstore_api::http::RouterOptions;
use charmstore_domain::SeriesSet;
use common::{app, app_with, get_json, CONCURRENT_REQUEST_COUNT};

// ============================================================
// Metadata
// ============================================================

/// Test: meta/any mixes entity, id and related facets
#[tokio::test]
async fn test_meta_any_across_groups() {
    let (status, json) = get_json(
        app(),
        "/precise/wordpress/meta/any?include=archive-size&include=id-revision&include=charm-related/provides&include=charm-config",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["Id"], "cs:precise/wordpress-23");
    assert_eq!(
        json["Meta"],
        json!({
            "archive-size": {"Size": 10240},
            "id-revision": {"Revision": 23},
            "charm-related/provides": {
                "memcache": [{"Id": "cs:~charmers/trusty/memcached-7"}],
                "mysql": [{"Id": "cs:trusty/mysql-5"}],
            },
            "charm-config": {"Options": {"blog-title": {
                "Type": "string",
                "Description": "The title of the blog",
                "Default": "My Title",
            }}},
        })
    );
}

/// Test: Output does not depend on concurrent group dispatch
#[tokio::test]
async fn test_sequential_and_concurrent_agree() {
    let uri = "/wordpress/meta/any?include=hash&include=id&include=charm-related&include=charm-actions";
    let (_, concurrent) = get_json(app(), uri).await;
    let (_, sequential) = get_json(
        app_with(RouterOptions {
            concurrent_meta_groups: false,
            ..RouterOptions::default()
        }),
        uri,
    )
    .await;
    assert_eq!(concurrent, sequential);
    assert_eq!(
        concurrent["Meta"]["charm-actions"]["ActionSpecs"]["backup"]["Description"],
        "Dump the database"
    );
}

/// Test: Related charms in both directions
#[tokio::test]
async fn test_charm_related() {
    let (status, json) = get_json(app(), "/mysql/meta/charm-related").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({"Requires": {"mysql": [
            {"Id": "cs:precise/wordpress-23"},
            {"Id": "cs:trusty/wordpress-24"},
        ]}})
    );

    let (status, json) = get_json(app(), "/mysql/meta/charm-related/provides").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["Code"], "metadata not found");
}

/// Test: Owned charms resolve through the ~user element
#[tokio::test]
async fn test_owned_charm() {
    let (status, json) = get_json(app(), "/~charmers/memcached/meta/id-user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"User": "charmers"}));

    // Without the owner the charm is not found.
    let (status, _) = get_json(app(), "/memcached/meta/id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Test: A trailing slash does not reach facet sub-paths
#[tokio::test]
async fn test_trailing_slash_on_facet_sub_path() {
    let (status, with_slash) = get_json(app(), "/mysql/meta/charm-related/requires/").await;
    assert_eq!(status, StatusCode::OK);
    let (_, without_slash) = get_json(app(), "/mysql/meta/charm-related/requires").await;
    assert_eq!(with_slash, without_slash);

    let (status, json) = get_json(app(), "/meta/charm-related/requires/?id=mysql").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mysql"], without_slash);
}

/// Test: An encoded owner element reaches owned charms
#[tokio::test]
async fn test_percent_encoded_owner() {
    let (status, json) = get_json(app(), "/%7Echarmers/memcached/meta/id").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"Id": "cs:~charmers/trusty/memcached-7"}));
}

/// Test: Bundle facets
#[tokio::test]
async fn test_bundle_facets() {
    let (status, json) = get_json(
        app(),
        "/bundle/wordpress-simple/meta/any?include=bundle-unit-count&include=bundle-machine-count&include=charm-metadata",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["Meta"],
        json!({
            "bundle-unit-count": {"Count": 2},
            "bundle-machine-count": {"Count": 2},
        })
    );
}

// ============================================================
// Configurable series
// ============================================================

/// Test: Only configured series are split off as the series element
#[tokio::test]
async fn test_series_set_is_configurable() {
    let options = RouterOptions {
        series: SeriesSet::new(["bundle", "trusty"]).unwrap(),
        ..RouterOptions::default()
    };

    // "precise" is no longer a series, so it is taken as the name.
    let (status, json) = get_json(app_with(options.clone()), "/precise/wordpress/meta").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["Code"], "not found");

    let (status, json) = get_json(app_with(options), "/trusty/wordpress/meta/id").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"Id": "cs:trusty/wordpress-24"}));
}

// ============================================================
// Bulk metadata
// ============================================================

/// Test: Bulk request keeps each caller spelling as a separate key
#[tokio::test]
async fn test_bulk_meta_caller_spellings() {
    let (status, json) = get_json(
        app(),
        "/meta/id-revision?id=wordpress&id=cs:trusty/wordpress&id=precise/wordpress-23&id=ghost",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "wordpress": {"Revision": 24},
            "cs:trusty/wordpress": {"Revision": 24},
            "precise/wordpress-23": {"Revision": 23},
        })
    );
}

/// Test: Bulk request for a facet nobody has returns an empty object
#[tokio::test]
async fn test_bulk_meta_all_omitted() {
    let (status, json) = get_json(app(), "/meta/charm-actions?id=mysql&id=ghost").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({}));
}

/// Test: A malformed id in a bulk request fails the request
#[tokio::test]
async fn test_bulk_meta_malformed_id() {
    let (status, json) = get_json(app(), "/meta/id?id=wordpress&id=Bad!Id").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["Code"], "bad request");
}

// ============================================================
// Concurrency
// ============================================================

/// Test: Concurrent requests share the read-only tables
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests() {
    let app = app();
    let tasks: Vec<_> = (0..CONCURRENT_REQUEST_COUNT)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let uri = if i % 2 == 0 {
                    "/wordpress/meta/archive-size"
                } else {
                    "/meta/archive-size?id=mysql&id=wordpress"
                };
                get_json(app, uri).await
            })
        })
        .collect();

    for (i, task) in tasks.into_iter().enumerate() {
        let (status, json) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        if i % 2 == 0 {
            assert_eq!(json, json!({"Size": 10496}));
        } else {
            assert_eq!(
                json,
                json!({"mysql": {"Size": 8192}, "wordpress": {"Size": 10496}})
            );
        }
    }
}
