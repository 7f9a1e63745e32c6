//! Compatibility resolver tests

use ddaportal::compat::arch::{normalize_arch, Arch, ArchSupport};
use ddaportal::compat::resolver::Resolver;
use openapi_client::models::{ComponentScope, Platform};

use crate::support::{component, device, ids, model_component, LOCAL_SERVER};

fn names(components: &[openapi_client::models::Component]) -> Vec<&str> {
    components.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn test_arch_normalization() {
    for raw in ["arm64", "aarch64", "linux-aarch64-jetson"] {
        assert_eq!(normalize_arch(raw), Some(Arch::Arm64));
    }
    for raw in ["amd64", "x86_64", "x86"] {
        assert_eq!(normalize_arch(raw), Some(Arch::Amd64));
    }
    assert_eq!(normalize_arch("armv7l"), None);
}

#[test]
fn test_component_without_platforms_is_always_compatible() {
    assert_eq!(ArchSupport::from_platforms(Some(&[] as &[Platform])), ArchSupport::All);
    assert_eq!(ArchSupport::from_platforms(None), ArchSupport::All);

    let resolver = Resolver::new(LOCAL_SERVER);
    let components = vec![component("generic", ComponentScope::Public, &[])];
    let devices = vec![device("pi", "aarch64"), device("nuc", "x86_64"), device("odd", "riscv64")];
    let resolution = resolver.resolve(&components, &devices, &ids(&["pi", "nuc", "odd"]));
    assert!(resolution.is_compatible("generic", None));
}

#[test]
fn test_no_selection_leaves_everything_compatible() {
    let resolver = Resolver::new(LOCAL_SERVER);
    let components = vec![
        component("arm.only", ComponentScope::Private, &["aarch64"]),
        component("x86.only", ComponentScope::Private, &["amd64"]),
        component("armv7.only", ComponentScope::Private, &["armv7l"]),
    ];
    let resolution = resolver.resolve(&components, &[device("pi", "arm64")], &[]);
    assert_eq!(resolution.compatible.len(), 3);
    assert!(resolution.incompatible.is_empty());
}

#[test]
fn test_mixed_selection_requires_every_architecture() {
    let resolver = Resolver::new(LOCAL_SERVER);
    let components = vec![
        component("arm.only", ComponentScope::Private, &["aarch64"]),
        component("x86.only", ComponentScope::Private, &["x86_64"]),
        component("multi", ComponentScope::Public, &["aarch64", "amd64"]),
    ];
    let devices = vec![device("jetson", "aarch64"), device("nuc", "amd64")];

    let single = resolver.resolve(&components, &devices, &ids(&["jetson"]));
    assert_eq!(names(&single.incompatible), vec!["x86.only"]);

    let mixed = resolver.resolve(&components, &devices, &ids(&["jetson", "nuc"]));
    assert_eq!(names(&mixed.incompatible), vec!["arm.only", "x86.only"]);
    assert_eq!(names(&mixed.compatible.public), vec!["multi"]);
    assert!(mixed.compatible.private.is_empty());
}

#[test]
fn test_unrecognized_device_fails_closed() {
    let resolver = Resolver::new(LOCAL_SERVER);
    let components = vec![
        component("arm.only", ComponentScope::Private, &["aarch64"]),
        component("anywhere", ComponentScope::Private, &[]),
    ];
    let devices = vec![device("legacy", "armv7l")];
    let resolution = resolver.resolve(&components, &devices, &ids(&["legacy"]));
    assert_eq!(names(&resolution.incompatible), vec!["arm.only"]);
    assert!(resolution.is_compatible("anywhere", None));
}

#[test]
fn test_recommended_is_filtered_by_compatibility() {
    let resolver = Resolver::new(LOCAL_SERVER);
    let components = vec![
        component("aws.edgeml.dda.LocalServer.arm64", ComponentScope::Private, &["aarch64"]),
        component("aws.edgeml.dda.LocalServer.amd64", ComponentScope::Private, &["amd64"]),
        model_component("cookie-model-arm", "cookie-model", &["arm64"]),
        model_component("cookie-model-x86", "cookie-model", &["x86_64"]),
        component("aws.greengrass.Nucleus", ComponentScope::Public, &[]),
    ];
    let devices = vec![device("jetson", "aarch64")];
    let resolution = resolver.resolve(&components, &devices, &ids(&["jetson"]));

    assert_eq!(
        names(&resolution.recommended),
        vec!["aws.edgeml.dda.LocalServer.arm64", "cookie-model-arm"]
    );
    assert!(resolution.is_compatible("aws.greengrass.Nucleus", None));
}
