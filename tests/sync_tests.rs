use std::{collections::HashMap, fs, path::Path};

use anyhow::anyhow;
use id_maps::{run, source::load_sources, Fetch, Shape, SourceDescriptor};
use tempfile::TempDir;

const NPCS: &str = r#"var npcs = [{"id":1,"name":"Goblin","size":2},{"id":2,"name":"Rat"},{"id":null,"name":"Ghost"}]"#;
const ITEMS: &str = r#"var items = [{"id":10,"name":"Sword"},{"id":11,"name":"Ring of \"Luck\""}];"#;

// Serves canned payloads; unknown URLs behave like a 404
struct StubFetcher(HashMap<&'static str, &'static str>);

impl StubFetcher {
    fn new(pages: &[(&'static str, &'static str)]) -> Self {
        Self(pages.iter().copied().collect())
    }
}

impl Fetch for StubFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        self.0
            .get(url)
            .map(|body| body.to_string())
            .ok_or_else(|| anyhow!("{url} answered 404 Not Found"))
    }
}

fn sources(root: &Path) -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new("http://stub/npcsmin.js", root.join("npcIdMap.ts"), Shape::Npc),
        SourceDescriptor::new("http://stub/itemsmin.js", root.join("itemIdMap.ts"), Shape::Simple),
    ]
}

#[tokio::test]
async fn writes_both_maps_in_order() {
    let tmp = TempDir::new().unwrap();
    let fetcher = StubFetcher::new(&[("http://stub/npcsmin.js", NPCS), ("http://stub/itemsmin.js", ITEMS)]);

    let reports = run(&sources(tmp.path()), &fetcher).await.unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].output, tmp.path().join("npcIdMap.ts"));
    assert_eq!((reports[0].entries, reports[0].skipped), (2, 1));
    assert_eq!((reports[1].entries, reports[1].skipped), (2, 0));

    let npcs = fs::read_to_string(tmp.path().join("npcIdMap.ts")).unwrap();
    assert!(npcs.starts_with("export interface NPC {"));
    assert!(npcs.contains("export const npcIdMap: Record<number, NPC> = {"));
    assert!(npcs.contains("  1: { name: \"Goblin\", size: 2 },"));
    assert!(npcs.contains("  2: { name: \"Rat\", size: 1 },"));
    assert!(!npcs.contains("Ghost"));

    let items = fs::read_to_string(tmp.path().join("itemIdMap.ts")).unwrap();
    assert_eq!(
        items,
        "export const itemIdMap: Record<number, string> = {\n  10: \"Sword\",\n  11: \"Ring of \\\"Luck\\\"\",\n};\n"
    );
}

#[tokio::test]
async fn garbage_payload_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let fetcher = StubFetcher::new(&[
        ("http://stub/npcsmin.js", "<html>maintenance</html>"),
        ("http://stub/itemsmin.js", ITEMS),
    ]);

    let err = run(&sources(tmp.path()), &fetcher).await.unwrap_err();
    assert!(format!("{err:#}").contains("no JSON array found"));
    assert!(!tmp.path().join("npcIdMap.ts").exists());
    assert!(!tmp.path().join("itemIdMap.ts").exists());
}

#[tokio::test]
async fn fetch_failure_stops_later_sources() {
    let tmp = TempDir::new().unwrap();
    let fetcher = StubFetcher::new(&[("http://stub/itemsmin.js", ITEMS)]);

    let err = run(&sources(tmp.path()), &fetcher).await.unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("http://stub/npcsmin.js"));
    assert!(msg.contains("404"));
    assert!(!tmp.path().join("itemIdMap.ts").exists());
}

#[tokio::test]
async fn item_without_id_aborts_after_npcs() {
    let tmp = TempDir::new().unwrap();
    let fetcher = StubFetcher::new(&[
        ("http://stub/npcsmin.js", NPCS),
        ("http://stub/itemsmin.js", r#"var items = [{"id":10,"name":"Sword"},{"name":"Mystery"}]"#),
    ]);

    let err = run(&sources(tmp.path()), &fetcher).await.unwrap_err();
    assert!(format!("{err:#}").contains("record 1 has no \"id\""));
    // NPCs ran first and stay written
    assert!(tmp.path().join("npcIdMap.ts").exists());
    assert!(!tmp.path().join("itemIdMap.ts").exists());
}

#[tokio::test]
async fn missing_output_directory_is_a_write_fault() {
    let tmp = TempDir::new().unwrap();
    let mut srcs = sources(tmp.path());
    srcs[0].output = tmp.path().join("src/lib/npcIdMap.ts");
    let fetcher = StubFetcher::new(&[("http://stub/npcsmin.js", NPCS), ("http://stub/itemsmin.js", ITEMS)]);

    let err = run(&srcs, &fetcher).await.unwrap_err();
    assert!(format!("{err:#}").contains("writing "));
    assert!(!tmp.path().join("src").exists());
    assert!(!tmp.path().join("itemIdMap.ts").exists());
}

#[tokio::test]
async fn sources_file_drives_the_run() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("monsterNames.ts");
    let config = tmp.path().join("sources.json");
    fs::write(
        &config,
        serde_json::json!([{
            "url": "http://stub/npcsmin.js",
            "output": out,
            "shape": "simple",
            "on_missing_field": "skip"
        }])
        .to_string(),
    )
    .unwrap();

    let srcs = load_sources(&config).unwrap();
    let fetcher = StubFetcher::new(&[("http://stub/npcsmin.js", NPCS)]);
    let reports = run(&srcs, &fetcher).await.unwrap();

    assert_eq!(reports[0].skipped, 1);
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("export const monsterNames: Record<number, string> = {"));
    assert!(text.contains("  1: \"Goblin\","));
}
