//! Build locations are a pure function of the app path

use std::path::{Path, PathBuf};

use mupship::BuildLocation;
use proptest::prelude::*;

fn app_path() -> impl Strategy<Value = PathBuf> {
    prop::collection::vec("[a-zA-Z0-9_.-]{1,12}", 1..6)
        .prop_map(|segments| PathBuf::from(format!("/{}", segments.join("/"))))
}

proptest! {
    #[test]
    fn same_path_same_location(path in app_path()) {
        let a = BuildLocation::derive_in(Path::new("/tmp"), &path);
        let b = BuildLocation::derive_in(Path::new("/tmp"), &path);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn different_paths_different_locations(a in app_path(), b in app_path()) {
        prop_assume!(a != b);
        prop_assert_ne!(
            BuildLocation::derive_in(Path::new("/tmp"), &a),
            BuildLocation::derive_in(Path::new("/tmp"), &b)
        );
    }

    #[test]
    fn location_is_a_v4_identifier_under_the_temp_root(path in app_path()) {
        let location = BuildLocation::derive_in(Path::new("/tmp"), &path);
        let name = location.path().file_name().unwrap().to_string_lossy().into_owned();

        prop_assert!(location.path().starts_with("/tmp"));
        prop_assert!(name.starts_with(BuildLocation::PREFIX));
        let id = uuid::Uuid::parse_str(&name[BuildLocation::PREFIX.len()..]).unwrap();
        prop_assert_eq!(id.get_version_num(), 4);
        prop_assert_eq!(location.bundle_path(), location.path().join("bundle.tar.gz"));
    }
}
