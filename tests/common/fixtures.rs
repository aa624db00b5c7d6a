//! Descriptor fixtures for integration tests.
#![allow(dead_code)]

use apiviz::domain::descriptor::{DescriptorSet, PackageDescriptor, TypeDescriptor, TypeKind};

pub fn class(qualified_name: &str) -> TypeDescriptor {
    TypeDescriptor::new(qualified_name)
}

pub fn interface(qualified_name: &str) -> TypeDescriptor {
    let mut descriptor = TypeDescriptor::new(qualified_name);
    descriptor.kind = TypeKind::Interface;
    descriptor
}

/// Adds one `@apiviz.<name>` tag occurrence.
pub fn tag(mut descriptor: TypeDescriptor, name: &str, body: &str) -> TypeDescriptor {
    descriptor
        .tags
        .entry(format!("@apiviz.{}", name))
        .or_default()
        .push(body.to_string());
    descriptor
}

pub fn package(name: &str, tags: &[(&str, &str)]) -> PackageDescriptor {
    let mut descriptor = PackageDescriptor::new(name);
    for (key, body) in tags {
        descriptor
            .tags
            .entry(format!("@apiviz.{}", key))
            .or_default()
            .push(body.to_string());
    }
    descriptor
}

/// `zoo.Cat extends zoo.Animal implements zoo.Pet`, a keeper who owns cats, and a hidden
/// internal helper used by the keeper.
pub fn zoo() -> DescriptorSet {
    let animal = {
        let mut d = class("zoo.Animal");
        d.is_abstract = true;
        d
    };
    let pet = interface("zoo.Pet");
    let cat = {
        let mut d = class("zoo.Cat");
        d.superclass = Some("zoo.Animal".into());
        d.interfaces = vec!["zoo.Pet".into()];
        d.see_also = vec!["zoo.Keeper".into()];
        d
    };
    let keeper = {
        let d = class("zoo.Keeper");
        let d = tag(d, "owns", "Cat - 0..* cats");
        let d = tag(d, "uses", "zoo.internal.Ledger");
        let mut d = tag(d, "category", "staff");
        d.see_also = vec!["zoo.Cat".into()];
        d
    };
    let ledger = tag(class("zoo.internal.Ledger"), "hidden", "");

    DescriptorSet {
        types: vec![animal, pet, cat, keeper, ledger],
        packages: vec![package("zoo", &[]), package("zoo.internal", &[("hidden", "")])],
    }
}

/// Three packages in a dependency chain with a redundant shortcut:
/// `app.web -> app.core -> app.util` and `app.web -> app.util`.
pub fn layered() -> DescriptorSet {
    let util = class("app.util.Strings");
    let core = {
        let mut d = class("app.core.Service");
        d.references = vec!["app.util.Strings".into()];
        d
    };
    let web = {
        let mut d = class("app.web.Controller");
        d.references = vec!["app.core.Service".into(), "app.util.Strings".into()];
        d
    };
    DescriptorSet {
        types: vec![util, core, web],
        packages: vec![],
    }
}
