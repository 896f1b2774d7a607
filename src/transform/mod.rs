//! Rule-driven transformation of extracted declarations.
//!
//! Runs exactly once per context, after extraction and before validation.
//! Order per type: property removals, per-property edits, additions,
//! discriminated-union synthesis, rename; then the naming convention over
//! every declaration. Interface definitions are re-rendered at the end so the
//! guard and generator see final text.

use std::collections::BTreeSet;

use crate::core::errors::Result;
use crate::core::rules::{DiscriminatorSpec, TypeTransform};
use crate::core::{ExtractedType, ExtractionContext, PropertyInfo, TypeKind};
use crate::generate::render::render_interface_definition;

/// Transformation stage entry point.
pub fn run_transformations(ctx: &mut ExtractionContext) -> Result<()> {
    let transforms = ctx.rules.transforms.clone();
    let mut changed: BTreeSet<String> = BTreeSet::new();

    for (target, transform) in &transforms {
        if transform.is_empty() {
            continue;
        }
        let Some(ty) = ctx.types.remove(target) else {
            log::debug!("transform target `{target}` not present in this run");
            continue;
        };
        let (final_name, edited) = apply_transform(ctx, ty, transform);
        if edited {
            changed.insert(final_name);
        }
    }

    // Adapter-supplied synthesis passes run after the declarative edits and
    // before the naming convention.
    let hooks = std::mem::take(&mut ctx.rules.custom_transforms);
    for hook in &hooks {
        for name in hook(&mut ctx.types) {
            changed.insert(name);
        }
    }
    ctx.rules.custom_transforms = hooks;

    apply_naming(ctx, &mut changed);

    ctx.metrics.transforms_applied += changed.len();
    refresh_interface_definitions(ctx);
    Ok(())
}

/// Apply one type's transform and re-insert it; returns its final name and
/// whether the record actually changed.
fn apply_transform(
    ctx: &mut ExtractionContext,
    mut ty: ExtractedType,
    transform: &TypeTransform,
) -> (String, bool) {
    let mut edited = false;

    for removed in &transform.remove_properties {
        let before = ty.properties.len();
        ty.properties.retain(|p| &p.name != removed);
        edited |= ty.properties.len() != before;
    }

    for (name, edit) in &transform.property_transforms {
        if let Some(property) = ty.properties.iter_mut().find(|p| &p.name == name) {
            if let Some(renamed) = &edit.rename {
                property.name = renamed.clone();
                edited = true;
            }
            if let Some(retyped) = &edit.retype {
                property.ty = retyped.clone();
                edited = true;
            }
            if let Some(optional) = edit.optional {
                property.optional = optional;
                edited = true;
            }
            if let Some(readonly) = edit.readonly {
                property.readonly = readonly;
                edited = true;
            }
        }
    }

    for added in &transform.add_properties {
        if ty.property(&added.name).is_none() {
            ty.properties.push(added.clone());
            edited = true;
        }
    }

    if let Some(spec) = &transform.discriminator {
        synthesize_union(ctx, &mut ty, spec);
        edited = true;
    }

    if let Some(renamed) = &transform.rename {
        if renamed != &ty.name {
            ty.name = renamed.clone();
            edited = true;
        }
    }

    let final_name = ty.name.clone();
    ctx.insert_type(ty);
    (final_name, edited)
}

/// Discriminated-union synthesis: one interface per variant with the
/// discriminator narrowed to its literal, then the base replaced by the union
/// alias over all variant names.
fn synthesize_union(ctx: &mut ExtractionContext, base: &mut ExtractedType, spec: &DiscriminatorSpec) {
    let shared: Vec<PropertyInfo> = base
        .properties
        .iter()
        .filter(|p| p.name != spec.property)
        .cloned()
        .collect();

    for (literal, variant_name) in &spec.variants {
        let mut variant = ExtractedType::new(
            variant_name.clone(),
            TypeKind::Interface,
            base.source_file.clone(),
        );
        variant.line = base.line;
        variant.column = base.column;
        variant.is_exported = base.is_exported;
        variant.type_parameters = base.type_parameters.clone();

        let mut properties: Vec<PropertyInfo> = Vec::with_capacity(shared.len() + 1);
        for property in &shared {
            if properties.iter().all(|p| p.name != property.name) {
                properties.push(property.clone());
            }
        }
        let mut discriminator = PropertyInfo::new(spec.property.clone(), format!("'{literal}'"));
        discriminator.readonly = base
            .property(&spec.property)
            .map(|p| p.readonly)
            .unwrap_or(false);
        properties.push(discriminator);
        variant.properties = properties;
        variant.definition = render_interface_definition(&variant);
        ctx.insert_type(variant);
    }

    let union = spec.variants.values().cloned().collect::<Vec<_>>().join(" | ");
    base.kind = TypeKind::TypeAlias;
    base.properties.clear();
    base.extends.clear();
    base.definition = format!("type {} = {};", base.name, union);
}

/// Apply the naming convention to every declaration; renames count as
/// transformations unless the type was already counted.
fn apply_naming(ctx: &mut ExtractionContext, changed: &mut BTreeSet<String>) {
    let renames: Vec<(String, String)> = ctx
        .types
        .keys()
        .filter_map(|name| {
            let renamed = ctx.rules.naming.apply(name);
            (renamed != *name).then(|| (name.clone(), renamed))
        })
        .collect();

    for (old, new) in renames {
        let Some(mut ty) = ctx.types.remove(&old) else {
            continue;
        };
        ty.name = new.clone();
        ctx.insert_type(ty);
        if changed.remove(&old) || !changed.contains(&new) {
            changed.insert(new);
        }
    }
}

/// Re-render every interface definition from its (possibly edited) property
/// list so downstream stages read final text.
fn refresh_interface_definitions(ctx: &mut ExtractionContext) {
    let names: Vec<String> = ctx.types.keys().cloned().collect();
    for name in names {
        let Some(ty) = ctx.types.get_mut(&name) else {
            continue;
        };
        if ty.kind == TypeKind::Interface {
            let definition = render_interface_definition(ty);
            ty.definition = definition;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::{ExtractionRules, NamingRule, PropertyTransform};
    use std::collections::BTreeMap;

    fn context_with(types: Vec<ExtractedType>, rules: ExtractionRules) -> ExtractionContext {
        let mut ctx = ExtractionContext::new(vec![], rules);
        for ty in types {
            ctx.insert_type(ty);
        }
        ctx
    }

    fn payment_base() -> ExtractedType {
        let mut ty = ExtractedType::new("Payment", TypeKind::Interface, "src/payment.ts");
        ty.properties = vec![
            PropertyInfo::new("id", "string"),
            PropertyInfo::new("amount", "number"),
            PropertyInfo::new("method", "string"),
        ];
        ty
    }

    #[test]
    fn discriminated_union_synthesis() {
        let mut rules = ExtractionRules::new("payments");
        let mut variants = BTreeMap::new();
        variants.insert("card".to_string(), "CardPayment".to_string());
        variants.insert("bank".to_string(), "BankPayment".to_string());
        rules.transforms.insert(
            "Payment".to_string(),
            TypeTransform {
                discriminator: Some(DiscriminatorSpec {
                    property: "method".to_string(),
                    variants,
                }),
                ..Default::default()
            },
        );

        let mut ctx = context_with(vec![payment_base()], rules);
        run_transformations(&mut ctx).unwrap();

        let card = &ctx.types["CardPayment"];
        assert_eq!(card.property("method").unwrap().ty, "'card'");
        assert_eq!(card.property("id").unwrap().ty, "string");
        assert_eq!(card.property("amount").unwrap().ty, "number");
        assert_eq!(card.properties.len(), 3);

        let bank = &ctx.types["BankPayment"];
        assert_eq!(bank.property("method").unwrap().ty, "'bank'");

        let base = &ctx.types["Payment"];
        assert_eq!(base.kind, TypeKind::TypeAlias);
        assert_eq!(base.definition, "type Payment = BankPayment | CardPayment;");
        assert_eq!(ctx.metrics.transforms_applied, 1);
    }

    #[test]
    fn property_edits_apply_in_order() {
        let mut rules = ExtractionRules::new("test");
        let mut property_transforms = BTreeMap::new();
        property_transforms.insert(
            "amount".to_string(),
            PropertyTransform {
                retype: Some("bigint".to_string()),
                readonly: Some(true),
                ..Default::default()
            },
        );
        rules.transforms.insert(
            "Payment".to_string(),
            TypeTransform {
                remove_properties: vec!["method".to_string()],
                property_transforms,
                add_properties: vec![PropertyInfo::new("currency", "string")],
                ..Default::default()
            },
        );

        let mut ctx = context_with(vec![payment_base()], rules);
        run_transformations(&mut ctx).unwrap();

        let payment = &ctx.types["Payment"];
        assert!(payment.property("method").is_none());
        let amount = payment.property("amount").unwrap();
        assert_eq!(amount.ty, "bigint");
        assert!(amount.readonly);
        assert_eq!(payment.property("currency").unwrap().ty, "string");
        assert!(payment.definition.contains("currency: string;"));
    }

    #[test]
    fn add_property_does_not_duplicate_existing() {
        let mut rules = ExtractionRules::new("test");
        rules.transforms.insert(
            "Payment".to_string(),
            TypeTransform {
                add_properties: vec![PropertyInfo::new("id", "number")],
                ..Default::default()
            },
        );
        let mut ctx = context_with(vec![payment_base()], rules);
        run_transformations(&mut ctx).unwrap();

        let payment = &ctx.types["Payment"];
        assert_eq!(
            payment.properties.iter().filter(|p| p.name == "id").count(),
            1
        );
        assert_eq!(payment.property("id").unwrap().ty, "string");
    }

    #[test]
    fn naming_prefix_applies_once() {
        let mut rules = ExtractionRules::new("test");
        rules.naming = NamingRule {
            prefix: Some("Test".to_string()),
            suffix: None,
            custom: None,
        };
        let mut ctx = context_with(
            vec![
                ExtractedType::new("User", TypeKind::Interface, "a.ts"),
                ExtractedType::new("TestUser", TypeKind::Interface, "b.ts"),
            ],
            rules,
        );
        run_transformations(&mut ctx).unwrap();

        // `User` collides into the already-conforming `TestUser`; the later
        // write wins and only one rename is counted.
        assert_eq!(ctx.types.len(), 1);
        assert!(ctx.types.contains_key("TestUser"));
        assert_eq!(ctx.metrics.transforms_applied, 1);
    }

    #[test]
    fn custom_transform_hook_runs_and_counts() {
        let mut rules = ExtractionRules::new("test");
        rules.custom_transforms.push(Box::new(|types| {
            let mut changed = Vec::new();
            if let Some(payment) = types.get_mut("Payment") {
                payment.properties.push(PropertyInfo::new("checksum", "string"));
                changed.push("Payment".to_string());
            }
            changed
        }));
        let mut ctx = context_with(vec![payment_base()], rules);
        run_transformations(&mut ctx).unwrap();

        assert!(ctx.types["Payment"].property("checksum").is_some());
        assert_eq!(ctx.metrics.transforms_applied, 1);
        assert!(ctx.types["Payment"].definition.contains("checksum: string;"));
    }

    #[test]
    fn rename_transform_moves_the_record() {
        let mut rules = ExtractionRules::new("test");
        rules.transforms.insert(
            "Payment".to_string(),
            TypeTransform {
                rename: Some("Charge".to_string()),
                ..Default::default()
            },
        );
        let mut ctx = context_with(vec![payment_base()], rules);
        run_transformations(&mut ctx).unwrap();

        assert!(!ctx.types.contains_key("Payment"));
        assert!(ctx.types.contains_key("Charge"));
        assert_eq!(ctx.metrics.transforms_applied, 1);
    }
}
