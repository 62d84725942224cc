use crate::myvr::resources::{ExistingPhoto, PhotoPayload};
use crate::myvr::{MyVrApi, MyVrApiExt};
use crate::sync::{fetch_existing, StepReport};
use tracing::{debug, warn};

/// File stem of a URL, lowercased, dashes turned into underscores
pub fn normalize_filename(url: &str) -> String {
    let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
    let base = path.rsplit('/').next().unwrap_or_default();
    let stem = match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    };
    stem.to_lowercase().replace('-', "_")
}

/// MyVR appends a counter to re-uploaded names (`pool.jpg` -> `pool1.jpg`),
/// so a candidate already exists if any stored name contains it.
/// A URL without a file name never matches.
fn already_uploaded(existing: &[String], candidate: &str) -> bool {
    !candidate.is_empty() && existing.iter().any(|name| name.contains(candidate))
}

/// Upload every feed photo that MyVR does not have yet
pub async fn sync_photos(api: &dyn MyVrApi, external_id: &str, photos: &[String]) -> StepReport {
    let mut report = StepReport::default();

    let Some(existing) = fetch_existing::<ExistingPhoto>(
        api,
        &format!("/photos/?property={}&limit=200", external_id),
    )
    .await
    else {
        report.failed += 1;
        return report;
    };

    // Only photos present before this run count as uploaded
    let existing: Vec<String> = existing
        .iter()
        .filter_map(|photo| photo.download_url.as_deref())
        .map(normalize_filename)
        .collect();

    for source_url in photos {
        let candidate = normalize_filename(source_url);
        if already_uploaded(&existing, &candidate) {
            debug!(%external_id, %source_url, "Photo already uploaded");
            report.skipped += 1;
            continue;
        }

        let payload = PhotoPayload {
            property: external_id.to_string(),
            source_url: source_url.clone(),
        };
        match api.post_json("/photos/", &payload).await {
            Ok(created) => report.record_created(created),
            Err(e) => {
                warn!(%external_id, %source_url, error = %e, "Failed to upload photo");
                report.failed += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeMyVr;
    use serde_json::json;

    #[test]
    fn test_normalize_filename() {
        assert_eq!(
            normalize_filename("https://cdn.example/villas/Villa-Mock-Pool.jpg"),
            "villa_mock_pool"
        );
        assert_eq!(
            normalize_filename("https://cdn.example/a/b/master_bedroom.JPG?w=800"),
            "master_bedroom"
        );
        assert_eq!(normalize_filename("https://cdn.example/a/noext"), "noext");
        assert_eq!(normalize_filename("https://cdn.example/a/.hidden"), ".hidden");
    }

    #[test]
    fn test_incremented_names_count_as_uploaded() {
        let existing = vec!["villa_mock_pool1".to_string()];
        assert!(already_uploaded(&existing, "villa_mock_pool"));
        assert!(!already_uploaded(&existing, "villa_mock_terrace"));
    }

    #[test]
    fn test_empty_file_name_is_never_uploaded_already() {
        let existing = vec!["villa_mock_pool1".to_string()];
        assert_eq!(normalize_filename("https://cdn.example/villas/"), "");
        assert!(!already_uploaded(&existing, ""));
    }

    #[tokio::test]
    async fn test_photos_created_in_same_run_do_not_shadow_later_ones() {
        let api = FakeMyVr::new();

        let photos = vec![
            "https://cdn.example/villa-10.jpg".to_string(),
            "https://cdn.example/villa-1.jpg".to_string(),
        ];
        let report = sync_photos(&api, "IELV_1", &photos).await;

        assert_eq!(report.created.len(), 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(api.collection("photos").len(), 2);
    }

    #[tokio::test]
    async fn test_uploads_only_new_photos() {
        let api = FakeMyVr::new();
        api.seed(
            "photos",
            json!({
                "property": "IELV_1",
                "downloadUrl": "https://img.myvr.com/abc/villa_mock_pool2.jpg"
            }),
        );

        let photos = vec![
            "https://cdn.example/Villa-Mock-Pool.jpg".to_string(),
            "https://cdn.example/Villa-Mock-Terrace.jpg".to_string(),
        ];
        let report = sync_photos(&api, "IELV_1", &photos).await;

        assert_eq!(report.created.len(), 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.created[0]["sourceUrl"], "https://cdn.example/Villa-Mock-Terrace.jpg");
        assert_eq!(api.count("GET", "/photos/?property=IELV_1&limit=200"), 1);
    }

    #[tokio::test]
    async fn test_failed_upload_continues_with_next_photo() {
        let api = FakeMyVr::new();
        api.fail("POST", "/photos/", 500);

        let photos = vec![
            "https://cdn.example/a.jpg".to_string(),
            "https://cdn.example/b.jpg".to_string(),
        ];
        let report = sync_photos(&api, "IELV_1", &photos).await;

        assert_eq!(report.failed, 2);
        assert_eq!(api.count("POST", "/photos/"), 2);
    }
}
