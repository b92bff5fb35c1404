//! Theme map discovery, the on-disk cache and the registry entry points.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, SystemTime};

use libxdg_basedir::StaticBaseDirs;
use libxdg_icons::icon::build_theme_map;
use libxdg_icons::{IconError, IconRegistry, IconSettings, ThemeMap, ThemeMapCache};
use tempfile::TempDir;

fn write_theme(icons: &Path, dir: &str, name: &str, inherits: &str) -> PathBuf {
    let theme_dir = icons.join(dir);
    fs::create_dir_all(&theme_dir).unwrap();
    let index = format!(
        "[Icon Theme]\nName={}\nInherits={}\nDirectories=16x16/apps\n\n\
         [16x16/apps]\nSize=16\nType=Fixed\nContext=Applications\n",
        name, inherits
    );
    fs::write(theme_dir.join("index.theme"), index).unwrap();
    theme_dir
}

fn touch(path: &Path) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
    path.to_path_buf()
}

fn age(path: &Path, by: Duration) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - by).unwrap();
}

#[test]
fn test_generate_walks_nested_directories() {
    let icons = TempDir::new().unwrap();
    write_theme(icons.path(), "foo", "Foo", "");
    write_theme(icons.path(), "group/bar", "Bar", "Foo");
    fs::create_dir_all(icons.path().join("not-a-theme/16x16")).unwrap();

    let map = ThemeMap::generate(icons.path()).unwrap();

    assert_eq!(map.names().collect::<Vec<_>>(), vec!["Bar", "Foo"]);
    let bar = map.get("Bar").unwrap();
    assert_eq!(bar.base_path, icons.path().join("group/bar"));
    assert_eq!(bar.parents, vec!["Foo"]);
}

#[test]
fn test_generate_missing_root_fails() {
    let root = TempDir::new().unwrap();
    let err = ThemeMap::generate(&root.path().join("absent")).unwrap_err();
    assert!(matches!(err, IconError::Walk { .. }));
}

#[test]
fn test_later_data_dirs_win() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let no_icons = TempDir::new().unwrap();
    write_theme(&first.path().join("icons"), "foo", "Foo", "");
    write_theme(&first.path().join("icons"), "hicolor", "hicolor", "");
    let winner = write_theme(&second.path().join("icons"), "foo", "Foo", "hicolor");

    let map = build_theme_map(&[
        first.path().to_path_buf(),
        no_icons.path().to_path_buf(),
        second.path().to_path_buf(),
    ])
    .unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map.get("Foo").unwrap().base_path, winner);
}

#[test]
fn test_cache_round_trip() {
    let data = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    write_theme(&data.path().join("icons"), "foo", "Foo", "Bar,hicolor");
    write_theme(&data.path().join("icons"), "bar", "Bar", "");

    let cache = ThemeMapCache::new(cache_dir.path().join("nested/libxdg-icons.json"));
    let built = cache.rebuild(&[data.path().to_path_buf()]).unwrap();

    assert!(cache.path().is_file());
    assert_eq!(cache.read().unwrap(), built);
}

#[test]
fn test_fresh_cache_is_served_without_rebuild() {
    let data = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let icons = data.path().join("icons");
    write_theme(&icons, "foo", "Foo", "");

    let base_dirs = StaticBaseDirs::new(cache_dir.path(), vec![data.path().to_path_buf()]);
    let cache = ThemeMapCache::in_cache_home(&base_dirs);
    assert_eq!(cache.path(), cache_dir.path().join("libxdg-icons.json"));

    let first = cache.load(&base_dirs).unwrap();
    assert_eq!(first.len(), 1);
    let written = fs::read(cache.path()).unwrap();

    // New themes are invisible until the cache expires.
    write_theme(&icons, "bar", "Bar", "");
    let second = cache.load(&base_dirs).unwrap();
    assert_eq!(second, first);
    assert_eq!(fs::read(cache.path()).unwrap(), written);
}

#[test]
fn test_stale_cache_is_rebuilt() {
    let data = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let icons = data.path().join("icons");
    write_theme(&icons, "foo", "Foo", "");

    let base_dirs = StaticBaseDirs::new(cache_dir.path(), vec![data.path().to_path_buf()]);
    let cache = ThemeMapCache::in_cache_home(&base_dirs).with_max_age(Duration::from_secs(3600));
    cache.load(&base_dirs).unwrap();

    write_theme(&icons, "bar", "Bar", "");
    age(cache.path(), Duration::from_secs(2 * 3600));
    assert!(!cache.is_fresh().unwrap());

    let rebuilt = cache.load(&base_dirs).unwrap();
    assert_eq!(rebuilt.len(), 2);
    assert!(cache.is_fresh().unwrap());
    assert_eq!(cache.read().unwrap(), rebuilt);
}

#[test]
fn test_concurrent_loads_agree() {
    let data = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    write_theme(&data.path().join("icons"), "foo", "Foo", "");
    let base_dirs = StaticBaseDirs::new(cache_dir.path(), vec![data.path().to_path_buf()]);

    let maps: Vec<ThemeMap> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let base_dirs = &base_dirs;
                s.spawn(move || ThemeMapCache::in_cache_home(base_dirs).load(base_dirs).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(maps.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(maps[0].len(), 1);
}

fn registry(data: &Path, cache: &Path, fallback_dirs: Vec<PathBuf>) -> IconRegistry {
    let settings = IconSettings {
        default_theme: "Foo".to_string(),
        fallback_dirs,
        ..IconSettings::default()
    };
    IconRegistry::with_base_dirs(
        settings,
        StaticBaseDirs::new(cache, vec![data.to_path_buf()]),
    )
}

#[test]
fn test_find_icon_defaults_with_fallback_name() {
    let data = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let foo = write_theme(&data.path().join("icons"), "foo", "Foo", "hicolor");
    let generic = touch(&foo.join("16x16/apps/application-x-executable.png"));
    let direct = touch(&foo.join("16x16/apps/firefox.png"));

    let registry = registry(data.path(), cache_dir.path(), vec![]);
    assert_eq!(registry.theme(), "Foo");

    assert_eq!(
        registry.find_icon_defaults("firefox", 16, 1, Some("application-x-executable")).unwrap(),
        direct
    );
    assert_eq!(
        registry.find_icon_defaults("unknown-app", 16, 1, Some("application-x-executable")).unwrap(),
        generic
    );

    let err = registry.find_icon_defaults("unknown-app", 16, 1, Some("")).unwrap_err();
    assert!(err.is_not_found());
    let err = registry.find_icon_defaults("unknown-app", 16, 1, Some("also-missing")).unwrap_err();
    assert!(matches!(err, IconError::IconNotFound(ref name) if name == "also-missing"));
}

#[test]
fn test_missing_default_theme_uses_hicolor() {
    let data = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let hicolor = write_theme(&data.path().join("icons"), "hicolor", "Hicolor", "");
    let expected = touch(&hicolor.join("16x16/apps/test.png"));

    let registry = registry(data.path(), cache_dir.path(), vec![]);
    assert_eq!(registry.find_icon_defaults("test", 16, 1, None).unwrap(), expected);
    assert_eq!(registry.find_icon("test", 16, 1, "hicolor").unwrap(), expected);
}

#[test]
fn test_cache_failure_is_an_error_not_a_panic() {
    let data = TempDir::new().unwrap();
    let blocker = TempDir::new().unwrap();
    // The "cache directory" is a regular file, so the cache cannot be written.
    let cache_home = touch(&blocker.path().join("cache-is-a-file"));

    let registry = registry(data.path(), &cache_home, vec![]);
    let err = registry.find_icon_defaults("test", 16, 1, None).unwrap_err();
    assert!(matches!(err, IconError::CacheWrite { .. }));
}
