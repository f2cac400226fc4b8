//! Stepwise decomposition of a schema towards BCNF.
//!
//! Each step produces fresh child schemas built from reset dependency copies;
//! the children rerun the full analysis pipeline against their own attribute
//! universe, so a dependency's tier in a child is independent of its tier in
//! the parent.

use relnf_core::{AttributeSet, NormalForm};

use crate::closure::closure_of;
use crate::fd::FunctionalDependency;
use crate::schema::Schema;
use crate::Result;

/// Decomposes one tier upwards from the schema's current normal form, or
/// `None` when the schema is already in BCNF.
pub fn decompose(schema: &Schema) -> Result<Option<Vec<Schema>>> {
    match schema.normal_form() {
        NormalForm::First => to_2nf(schema),
        NormalForm::Second => to_3nf(schema),
        NormalForm::Third => to_bcnf(schema),
        NormalForm::BoyceCodd => Ok(None),
    }
}

/// Repeatedly decomposes until every resulting schema is in BCNF.
#[tracing::instrument(skip_all, fields(schema = %schema))]
pub fn normalize(schema: &Schema) -> Result<Vec<Schema>> {
    let mut current = vec![schema.clone()];
    loop {
        let mut next = Vec::with_capacity(current.len());
        let mut changed = false;
        for s in &current {
            match decompose(s)? {
                Some(children) => {
                    tracing::debug!(parent = %s, tier = %s.normal_form(), "decomposed");
                    changed = true;
                    next.extend(children);
                }
                None => next.push(s.clone()),
            }
        }
        current = next;
        if !changed {
            return Ok(current);
        }
    }
}

/// Removes partial dependencies by grouping each 2NF violator with the
/// dependencies reachable from it through the partial pool; the remaining
/// attributes, candidate keys and full dependencies form one final child.
///
/// Returns `None` when the schema already satisfies 2NF.
pub fn to_2nf(schema: &Schema) -> Result<Option<Vec<Schema>>> {
    if schema.normal_form() >= NormalForm::Second {
        return Ok(None);
    }

    let mut children = Vec::new();
    let mut pool = schema.partial_fds().to_vec();
    let mut grouped = Vec::new();

    // Attributes the remainder child starts from: everything the full
    // dependencies touch plus every candidate key.
    let mut remainder_attrs = schema
        .full_fds()
        .iter()
        .fold(AttributeSet::new(), |acc, fd| acc.union(&fd.attributes()));
    for key in schema.candidate_keys() {
        remainder_attrs = remainder_attrs.union(key);
    }

    // Each unabsorbed 2NF violator seeds a group. The group's attributes are
    // the closure of the violator's LHS under the partial pool, and the group
    // collects every pool dependency whose LHS falls inside that closure.
    while let Some(pos) = pool.iter().position(|fd| fd.normal_form() < NormalForm::Second) {
        let seed = pool.remove(pos);
        let closure = {
            let mut ctx = pool.clone();
            ctx.push(seed.clone());
            closure_of(seed.lhs(), &ctx)
        };

        let mut group = vec![seed];
        pool.retain(|fd| {
            let absorbed = closure.set().is_superset(fd.lhs());
            if absorbed {
                group.push(fd.clone());
            }
            !absorbed
        });

        let child = child_schema(schema, closure.set().clone(), &group)?;
        remainder_attrs = remainder_attrs.difference(child.non_key_attributes());
        grouped.extend(group);
        children.push(child);
    }

    // Dragged dependencies that no group absorbed fall through to the
    // remainder along with the full dependencies.
    let remainder_fds = schema
        .minimal_cover()
        .iter()
        .filter(|fd| !grouped.contains(fd))
        .cloned()
        .collect::<Vec<_>>();
    for fd in &remainder_fds {
        remainder_attrs = remainder_attrs.union(&fd.attributes());
    }
    if !remainder_attrs.is_empty() {
        children.push(child_schema(schema, remainder_attrs, &remainder_fds)?);
    }

    Ok(Some(children))
}

/// Removes transitive dependencies: every sub-3NF cover dependency becomes
/// its own child over `lhs ∪ rhs`; the attributes not yet covered keep the
/// remaining cover dependencies. If no child ends up holding a full candidate
/// key, a key-only child is appended to preserve the key.
///
/// Returns `None` when the schema already satisfies 3NF.
pub fn to_3nf(schema: &Schema) -> Result<Option<Vec<Schema>>> {
    if schema.normal_form() >= NormalForm::Third {
        return Ok(None);
    }

    let mut children = Vec::new();
    let mut finished = AttributeSet::new();
    let mut remainder_fds = Vec::new();
    for fd in schema.minimal_cover() {
        if fd.normal_form() < NormalForm::Third {
            finished = finished.union(fd.rhs());
            children.push(child_schema(schema, fd.attributes(), std::slice::from_ref(fd))?);
        } else {
            remainder_fds.push(fd.clone());
        }
    }

    let mut remaining = schema.attributes().difference(&finished);
    if !remaining.is_empty() {
        for fd in &remainder_fds {
            remaining = remaining.union(&fd.attributes());
        }
        children.push(child_schema(schema, remaining, &remainder_fds)?);
    }

    let key_survives = schema
        .candidate_keys()
        .iter()
        .any(|key| children.iter().any(|c| c.attributes().is_superset(key)));
    if !key_survives {
        children.push(child_schema(schema, schema.primary_key().clone(), &[])?);
    }

    Ok(Some(children))
}

/// Splits out every BCNF-violating dependency `X -> Y` into a child over
/// `X ∪ Y`, shrinks the remainder to the attributes no violator's RHS
/// claimed, and repeats on any child that still violates BCNF.
///
/// Returns `None` when the schema already satisfies BCNF.
pub fn to_bcnf(schema: &Schema) -> Result<Option<Vec<Schema>>> {
    if schema.normal_form().is_bcnf() {
        return Ok(None);
    }

    let mut done = Vec::new();
    let mut work = vec![schema.clone()];
    while let Some(r) = work.pop() {
        if r.normal_form().is_bcnf() {
            done.push(r);
            continue;
        }

        let mut dustbin = AttributeSet::new();
        let mut kept = Vec::new();
        for fd in r.fds() {
            if fd.in_bcnf() {
                kept.push(fd.clone());
            } else {
                dustbin = dustbin.union(fd.rhs());
                work.push(child_schema(&r, fd.attributes(), std::slice::from_ref(fd))?);
            }
        }

        // The remainder keeps a dependency only if its LHS survives whole;
        // its RHS is trimmed to the surviving attributes.
        let remainder_attrs = r.attributes().difference(&dustbin);
        if !remainder_attrs.is_empty() {
            let remainder_fds = kept
                .into_iter()
                .filter(|fd| remainder_attrs.is_superset(fd.lhs()))
                .filter_map(|fd| {
                    let rhs = fd.rhs().intersection(&remainder_attrs);
                    (!rhs.is_empty()).then(|| FunctionalDependency::new(fd.lhs().clone(), rhs))
                })
                .collect::<Vec<_>>();
            work.push(child_schema(&r, remainder_attrs, &remainder_fds)?);
        }
    }

    done.sort_by(|a, b| a.attributes().cmp(b.attributes()));
    Ok(Some(done))
}

/// Builds a child schema carrying the parent's name; the dependencies are
/// handed over as fresh 1NF copies so the child classifies them against its
/// own keys.
fn child_schema(
    parent: &Schema,
    attributes: AttributeSet,
    fds: &[FunctionalDependency],
) -> Result<Schema> {
    let fds = fds.iter().map(FunctionalDependency::reset).collect();
    Schema::new(parent.name().clone(), attributes, fds)
}
