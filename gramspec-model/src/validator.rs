//! Structural checks over a finished [`Specification`].
//!
//! The builder enforces these as it goes; the validator re-checks them on
//! the whole model so a broken walker sequence surfaces before later passes
//! consume the model.

use crate::model::*;
use proc_macro2::Span;
use std::collections::HashSet;
use syn::{Error, Result};

/// Runs every check and combines all failures into one error.
pub fn validate(spec: &Specification) -> Result<()> {
    let mut errors = Errors::default();

    check_dense_ids(spec, &mut errors);
    check_namespaces(spec, &mut errors);
    check_region_sets(spec, &mut errors);
    check_token_instances(spec, &mut errors);
    check_literals(spec, &mut errors);
    check_productions(spec, &mut errors);
    check_nt_defs(spec, &mut errors);

    errors.finish()
}

#[derive(Default)]
struct Errors(Option<Error>);

impl Errors {
    fn push(&mut self, span: Span, message: impl std::fmt::Display) {
        let err = Error::new(span, message);
        match &mut self.0 {
            Some(e) => e.combine(err),
            None => self.0 = Some(err),
        }
    }

    fn finish(self) -> Result<()> {
        match self.0 {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

macro_rules! check_dense {
    ($errors:expr, $arena:expr, $what:literal) => {
        for (i, item) in $arena.iter().enumerate() {
            if item.id.index() != i {
                $errors.push(
                    Span::call_site(),
                    format!("{} at slot {} carries id {}", $what, i, item.id),
                );
            }
        }
    };
}

fn check_dense_ids(spec: &Specification, errors: &mut Errors) {
    check_dense!(errors, spec.namespaces, "namespace");
    check_dense!(errors, spec.objects, "object");
    check_dense!(errors, spec.scopes, "scope");
    check_dense!(errors, spec.fields, "field");
    check_dense!(errors, spec.regions, "region");
    check_dense!(errors, spec.region_sets, "region set");
    check_dense!(errors, spec.token_defs, "token");
    check_dense!(errors, spec.token_instances, "token instance");
    check_dense!(errors, spec.productions, "production");
    check_dense!(errors, spec.nt_defs, "nonterminal");
    check_dense!(errors, spec.patterns, "pattern");
    check_dense!(errors, spec.constructors, "constructor");
    check_dense!(errors, spec.functions, "function");
    check_dense!(errors, spec.contexts, "context");
}

fn check_namespaces(spec: &Specification, errors: &mut Errors) {
    for nspace in &spec.namespaces {
        if nspace.is_root() != (nspace.id.index() == 0) {
            errors.push(nspace.span, format!("namespace {} has a misplaced root", nspace.name));
        }
        let mut seen = HashSet::new();
        for child in &nspace.children {
            let child = spec.namespace(*child);
            if child.parent != Some(nspace.id) {
                errors.push(
                    child.span,
                    format!("namespace {} is not linked to its parent", child.name),
                );
            }
            if !seen.insert(child.name.as_str()) {
                errors.push(
                    child.span,
                    format!("namespace {} declared twice under the same parent", child.name),
                );
            }
        }
    }
}

fn check_region_sets(spec: &Specification, errors: &mut Errors) {
    for set in &spec.region_sets {
        let collect = spec.region(set.collect_ignore);
        let ignore_only = spec.region(set.ignore_only);
        if collect.imp != ignore_only.imp || collect.ignore_only != Some(set.ignore_only) {
            errors.push(
                collect.span,
                format!(
                    "collect-ignore region of region set {} is not tied to its ignore-only region",
                    set.id
                ),
            );
        }
        for role in [RegionRole::TokenIgnore, RegionRole::TokenOnly, RegionRole::IgnoreOnly] {
            let region = spec.region(set.region(role));
            let expected = match role {
                RegionRole::TokenIgnore => set.impl_token_ignore,
                RegionRole::TokenOnly => set.impl_token_only,
                _ => set.impl_ignore_only,
            };
            if region.imp != expected {
                errors.push(
                    region.span,
                    format!("region {} uses the wrong implementation", region.id),
                );
            }
        }
    }
}

fn check_token_instances(spec: &Specification, errors: &mut Errors) {
    for inst in &spec.token_instances {
        let Some(orig) = inst.dup_of else {
            continue;
        };
        let orig = spec.token_instance(orig);
        if orig.is_duplicate() {
            errors.push(
                inst.span,
                format!("token instance {} duplicates another duplicate", inst.id),
            );
        }
        if orig.token_def != inst.token_def {
            errors.push(
                inst.span,
                format!("token instance {} duplicates an instance of another token", inst.id),
            );
        }
    }

    for def in &spec.token_defs {
        let canonical = def
            .instances
            .iter()
            .filter(|id| !spec.token_instance(**id).is_duplicate())
            .count();
        let expected = if def.is_zero { 0 } else { 1 };
        if canonical != expected {
            errors.push(
                def.span,
                format!("token {} has {} canonical instances", def.name, canonical),
            );
        }
    }
}

fn check_literals(spec: &Specification, errors: &mut Errors) {
    for nspace in &spec.namespaces {
        for (text, inst) in &nspace.literals {
            let inst = spec.token_instance(*inst);
            let def = spec.token_def(inst.token_def);
            if inst.is_duplicate() || !def.is_literal() || def.namespace != nspace.id {
                errors.push(inst.span, format!("literal {:?} maps to the wrong token", text));
            }
        }
    }
}

fn check_productions(spec: &Specification, errors: &mut Errors) {
    for prod in &spec.productions {
        for (i, el) in prod.elements.iter().enumerate() {
            if el.pos != i {
                errors.push(
                    el.span,
                    format!("element {} of a production has position {}", i, el.pos),
                );
            }
            if el.production != Some(prod.id) {
                errors.push(el.span, "production element is not linked to its production");
            }
        }
    }
}

fn check_nt_defs(spec: &Specification, errors: &mut Errors) {
    for nt in &spec.nt_defs {
        for (i, prod) in nt.productions.iter().enumerate() {
            let prod = spec.production(*prod);
            if prod.nt_def != Some(nt.id) {
                errors.push(prod.span, format!("alternative of {} is not linked to it", nt.name));
            }
            if prod.prod_num != i {
                errors.push(
                    prod.span,
                    format!("alternative {} of {} is numbered {}", i, nt.name, prod.prod_num),
                );
            }
        }
    }
}
