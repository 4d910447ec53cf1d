use cvesift::config::{Config, IgnoreConfig};
use cvesift::model::{MatchPolicy, VulnRecord};
use cvesift::pipeline;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_cve(dir: &Path, id: &str, product: &str, vendor: &str) {
    let doc = json!({
        "cveMetadata": { "cveId": id },
        "containers": {
            "cna": {
                "affected": [ { "product": product, "vendor": vendor } ]
            }
        }
    });
    fs::write(dir.join(format!("{}.json", id)), doc.to_string()).unwrap();
}

fn test_config(root: &Path, policy: MatchPolicy) -> Config {
    Config {
        cve_dir: root.join("cves"),
        registry_path: root.join("registry.json"),
        output_dir: root.join("out"),
        policy,
        vendor_keyword: "tensorflow".to_string(),
        default_format: "json".to_string(),
        ignore: IgnoreConfig::default(),
    }
}

fn read_summary(path: &Path) -> Vec<VulnRecord> {
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_exact_policy_full_run() {
    let temp = tempdir().unwrap();
    let folder = temp.path().join("cves").join("0xxx");
    fs::create_dir_all(&folder).unwrap();

    write_cve(&folder, "CVE-2022-0002", "foo", "bar");
    write_cve(&folder, "CVE-2022-0001", "foo", "bar");
    write_cve(&folder, "CVE-2022-0003", "foo", "baz-vendor");

    fs::write(
        temp.path().join("registry.json"),
        r#"[{"name": "foo", "author": "bar", "version": "1.0"}]"#,
    )
    .unwrap();

    let config = test_config(temp.path(), MatchPolicy::Exact);
    let report = pipeline::run(&config).unwrap();

    assert_eq!(report.folders.len(), 1);
    assert_eq!(report.folders[0].scanned, 3);
    assert_eq!(report.folders[0].kept, 2);

    let out_dir = temp.path().join("out").join("0xxx");
    let summary = read_summary(&out_dir.join("report.json"));

    // Sorted ascending by identifier, vendor-mismatched record dropped.
    let ids: Vec<&str> = summary.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["CVE-2022-0001", "CVE-2022-0002"]);

    // Matches carry the full registry entry.
    assert_eq!(
        summary[0].products[0].matches,
        vec![json!({"name": "foo", "author": "bar", "version": "1.0"})]
    );

    // Copies mirror exactly the kept set.
    assert!(out_dir.join("CVE-2022-0001.json").exists());
    assert!(out_dir.join("CVE-2022-0002.json").exists());
    assert!(!out_dir.join("CVE-2022-0003.json").exists());

    // Copies are byte-identical to the originals.
    assert_eq!(
        fs::read(folder.join("CVE-2022-0001.json")).unwrap(),
        fs::read(out_dir.join("CVE-2022-0001.json")).unwrap()
    );
}

#[test]
fn test_exact_policy_author_mismatch_drops_record() {
    let temp = tempdir().unwrap();
    let folder = temp.path().join("cves").join("0xxx");
    fs::create_dir_all(&folder).unwrap();

    write_cve(&folder, "CVE-2022-1", "foo", "bar");

    fs::write(
        temp.path().join("registry.json"),
        r#"[{"name": "foo", "author": "baz"}]"#,
    )
    .unwrap();

    let config = test_config(temp.path(), MatchPolicy::Exact);
    let report = pipeline::run(&config).unwrap();

    assert_eq!(report.folders[0].kept, 0);

    let summary = read_summary(&temp.path().join("out/0xxx/report.json"));
    assert!(summary.is_empty());
    assert!(!temp.path().join("out/0xxx/CVE-2022-1.json").exists());
}

#[test]
fn test_membership_policy_with_vendor_keyword() {
    let temp = tempdir().unwrap();
    let folder = temp.path().join("cves").join("2xxx");
    fs::create_dir_all(&folder).unwrap();

    write_cve(&folder, "CVE-2024-2001", "TensorFlow", "Google");
    write_cve(&folder, "CVE-2024-2002", "keras", "tensorflow");
    write_cve(&folder, "CVE-2024-2003", "torch", "meta");

    fs::write(
        temp.path().join("registry.json"),
        r#"{"https://example.com/tf": ["tensorflow", "keras"], "https://example.com/other": ["keras"]}"#,
    )
    .unwrap();

    let config = test_config(temp.path(), MatchPolicy::Membership);
    let report = pipeline::run(&config).unwrap();

    assert_eq!(report.folders[0].kept, 2);

    let summary = read_summary(&temp.path().join("out/2xxx/report.json"));
    let ids: Vec<&str> = summary.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["CVE-2024-2001", "CVE-2024-2002"]);

    // "keras" appears in two name lists, so it matches twice; membership
    // matches record the product name, not a registry entry.
    assert_eq!(
        summary[1].products[0].matches,
        vec![json!("keras"), json!("keras")]
    );

    // "TensorFlow" (capitalized) is kept by the keyword rule but is not an
    // exact element of any name list, so it carries no matches.
    assert!(summary[0].products[0].matches.is_empty());
}

#[test]
fn test_missing_registry_disables_matching() {
    let temp = tempdir().unwrap();
    let folder = temp.path().join("cves").join("0xxx");
    fs::create_dir_all(&folder).unwrap();

    write_cve(&folder, "CVE-2022-1", "foo", "bar");

    // No registry.json written.
    let config = test_config(temp.path(), MatchPolicy::Exact);
    let report = pipeline::run(&config).unwrap();

    // The run completes; nothing matches, the empty summary is still written.
    assert_eq!(report.folders[0].scanned, 1);
    assert_eq!(report.folders[0].kept, 0);
    assert!(read_summary(&temp.path().join("out/0xxx/report.json")).is_empty());
}

#[test]
fn test_missing_registry_keeps_keyword_records() {
    let temp = tempdir().unwrap();
    let folder = temp.path().join("cves").join("0xxx");
    fs::create_dir_all(&folder).unwrap();

    write_cve(&folder, "CVE-2024-1", "tensorflow", "google");

    // The membership keep rule looks at the keyword, not at match lists, so
    // a missing registry only empties the matches.
    let config = test_config(temp.path(), MatchPolicy::Membership);
    let report = pipeline::run(&config).unwrap();

    assert_eq!(report.folders[0].kept, 1);
    let summary = read_summary(&temp.path().join("out/0xxx/report.json"));
    assert!(summary[0].products[0].matches.is_empty());
}

#[test]
fn test_malformed_file_skipped_rest_processed() {
    let temp = tempdir().unwrap();
    let folder = temp.path().join("cves").join("0xxx");
    fs::create_dir_all(&folder).unwrap();

    write_cve(&folder, "CVE-2022-1", "foo", "bar");
    fs::write(folder.join("broken.json"), "{not valid").unwrap();

    fs::write(
        temp.path().join("registry.json"),
        r#"[{"name": "foo", "author": "bar"}]"#,
    )
    .unwrap();

    let config = test_config(temp.path(), MatchPolicy::Exact);
    let report = pipeline::run(&config).unwrap();

    assert_eq!(report.folders[0].scanned, 1);
    assert_eq!(report.folders[0].skipped, 1);
    assert_eq!(report.folders[0].kept, 1);
}

#[test]
fn test_folders_processed_in_name_order() {
    let temp = tempdir().unwrap();
    for name in ["9xxx", "0xxx", "5xxx"] {
        let folder = temp.path().join("cves").join(name);
        fs::create_dir_all(&folder).unwrap();
        write_cve(&folder, &format!("CVE-2022-{}", &name[..1]), "foo", "bar");
    }

    fs::write(
        temp.path().join("registry.json"),
        r#"[{"name": "foo", "author": "bar"}]"#,
    )
    .unwrap();

    let config = test_config(temp.path(), MatchPolicy::Exact);
    let report = pipeline::run(&config).unwrap();

    let names: Vec<&str> = report.folders.iter().map(|f| f.folder.as_str()).collect();
    assert_eq!(names, ["0xxx", "5xxx", "9xxx"]);

    // Each output subfolder mirrors its input subfolder name.
    for name in ["0xxx", "5xxx", "9xxx"] {
        assert!(temp.path().join("out").join(name).join("report.json").exists());
    }
}

#[test]
fn test_no_fabrication() {
    let temp = tempdir().unwrap();
    let folder = temp.path().join("cves").join("0xxx");
    fs::create_dir_all(&folder).unwrap();

    write_cve(&folder, "CVE-2022-1", "foo", "bar");
    write_cve(&folder, "CVE-2022-2", "other", "vendor");

    fs::write(
        temp.path().join("registry.json"),
        r#"[{"name": "foo", "author": "bar"}, {"name": "other", "author": "vendor"}]"#,
    )
    .unwrap();

    let config = test_config(temp.path(), MatchPolicy::Exact);
    pipeline::run(&config).unwrap();

    let summary = read_summary(&temp.path().join("out/0xxx/report.json"));
    let input_ids = ["CVE-2022-1", "CVE-2022-2"];
    for record in &summary {
        assert!(input_ids.contains(&record.id.as_str()));
    }
}

#[test]
fn test_ignore_list_suppresses_records() {
    let temp = tempdir().unwrap();
    let folder = temp.path().join("cves").join("0xxx");
    fs::create_dir_all(&folder).unwrap();

    write_cve(&folder, "CVE-2022-1", "foo", "bar");
    write_cve(&folder, "CVE-2022-2", "foo", "bar");

    fs::write(
        temp.path().join("registry.json"),
        r#"[{"name": "foo", "author": "bar"}]"#,
    )
    .unwrap();

    let mut config = test_config(temp.path(), MatchPolicy::Exact);
    config.ignore.records.push("CVE-2022-1".to_string());

    let report = pipeline::run(&config).unwrap();

    assert_eq!(report.folders[0].kept, 1);
    let summary = read_summary(&temp.path().join("out/0xxx/report.json"));
    assert_eq!(summary[0].id, "CVE-2022-2");
    assert!(!temp.path().join("out/0xxx/CVE-2022-1.json").exists());
}
