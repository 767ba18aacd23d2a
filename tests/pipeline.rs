//! End-to-end: `webhead.toml` → collector → prepare → files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use webhead::utils::path::normalize_path;
use webhead::{AssetKind, WebHeadConfig, WebHeadError};

struct Site {
    _dir: TempDir,
    root: PathBuf,
}

impl Site {
    fn new(config: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = normalize_path(dir.path());
        fs::create_dir_all(root.join("www/webtemp")).unwrap();
        fs::write(root.join("webhead.toml"), config).unwrap();
        Self { _dir: dir, root }
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn load(&self) -> WebHeadConfig {
        WebHeadConfig::load(&self.root.join("webhead.toml")).unwrap()
    }

    fn read_url(&self, url: &str) -> String {
        let name = url.strip_prefix("/webtemp/").unwrap();
        fs::read_to_string(self.root.join("www/webtemp").join(name)).unwrap()
    }

    fn outputs(&self) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(self.root.join("www/webtemp"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

const COMPILER: &str = r#"
[compiler]
output_dir = "www/webtemp"
public_url_prefix = "/webtemp"
filters = ["css-minifier", "js-minifier"]
"#;

#[test]
fn compiles_minifies_and_rewrites() {
    let site = Site::new(&format!(
        "{COMPILER}
[[css]]
path = \"www/css/site.css\"
priority = 10
attrs = {{ title = \"Main\" }}

[[js]]
path = \"www/js/app.js\"

[[js]]
path = \"https://cdn.example.com/lib.js\"
priority = \"20\"
"
    ));
    site.write(
        "www/css/site.css",
        "body {\n  background: url(img/bg.png);\n  color: red;\n}\n",
    );
    site.write("www/js/app.js", "function hello(name) {\n  return 'hi ' + name;\n}\n");

    let mut head = site.load().into_collector().unwrap();
    head.prepare().unwrap();

    let all = head.get_all();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].file, "https://cdn.example.com/lib.js");
    assert_eq!(all[0].priority, 20);
    assert!(!all[0].compiled);

    let css = all[1];
    assert_eq!(css.kind, AssetKind::Css);
    assert!(css.compiled);
    assert!(css.file.starts_with("/webtemp/site-") && css.file.ends_with(".css"));
    assert_eq!(css.attrs["title"], "Main");
    let content = site.read_url(&css.file);
    assert!(content.contains("../css/img/bg.png"));
    assert!(!content.contains('\n'));

    let js = all[2];
    assert!(js.file.starts_with("/webtemp/app-") && js.file.ends_with(".js"));
    assert!(site.read_url(&js.file).trim_end().len() < 46);

    assert_eq!(site.outputs().len(), 2);
}

#[test]
fn join_mode_writes_one_bundle_per_group() {
    let site = Site::new(&format!(
        "css = [\"www/css/a.css\", \"www/css/b.css\"]
js = [\"www/js/one.js\", \"www/js/two.js\"]
{COMPILER}join_files = true
"
    ));
    site.write("www/css/a.css", "a { color: red; }");
    site.write("www/css/b.css", "b { color: blue; }");
    site.write("www/js/one.js", "var one = 1;");
    site.write("www/js/two.js", "var two = 2;");

    let mut head = site.load().into_collector().unwrap();
    head.prepare().unwrap();

    let css = head.get_css();
    assert_eq!(css.len(), 1);
    assert_eq!(css["screen"].len(), 1);
    assert!(css["screen"][0].starts_with("/webtemp/_joined-css-screen-"));

    let js = head.get_js();
    assert_eq!(js.len(), 1);
    let bundle = site.read_url(&js[0]);
    let one = bundle.find("one.js").unwrap();
    let two = bundle.find("two.js").unwrap();
    assert!(one < two);

    // 4 per-file entries + 2 bundles
    assert_eq!(site.outputs().len(), 6);
}

#[test]
fn second_run_hits_cache() {
    let site = Site::new(&format!("css = [\"www/css/a.css\"]\n{COMPILER}"));
    site.write("www/css/a.css", "a { color: red; }");

    let mut first = site.load().into_collector().unwrap();
    first.prepare().unwrap();
    let url = first.get_css()["screen"][0].clone();
    let written = site.root.join("www/webtemp").join(url.trim_start_matches("/webtemp/"));
    let mtime = fs::metadata(&written).unwrap().modified().unwrap();

    let mut second = site.load().into_collector().unwrap();
    second.prepare().unwrap();
    assert_eq!(second.get_css()["screen"][0], url);
    assert_eq!(fs::metadata(&written).unwrap().modified().unwrap(), mtime);
    assert_eq!(site.outputs().len(), 1);
}

#[test]
fn missing_source_fails_without_writing() {
    let site = Site::new(&format!(
        "css = [\"www/css/a.css\", \"www/css/gone.css\"]\n{COMPILER}"
    ));
    site.write("www/css/a.css", "a { color: red; }");

    let mut head = site.load().into_collector().unwrap();
    let err = head.prepare().unwrap_err();
    match err {
        WebHeadError::MissingAsset { path, .. } => {
            assert!(path.ends_with(Path::new("www/css/gone.css")));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(site.outputs().is_empty());
}

#[test]
fn no_compiler_keeps_declared_paths() {
    let site = Site::new("css = [\"www/css/a.css\"]\n");
    let mut head = site.load().into_collector().unwrap();
    head.prepare().unwrap();

    let expected = site.root.join("www/css/a.css").to_string_lossy().into_owned();
    assert_eq!(head.get_css()["screen"], [expected]);
}
