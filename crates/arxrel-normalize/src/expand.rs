//! Exploding one-to-many fields into (parent, child) rows

/// One row per child, parent key repeated, input order kept. No dedup.
pub fn explode<K, I>(pairs: impl IntoIterator<Item = (K, I)>) -> Vec<(K, I::Item)>
where
    K: Clone,
    I: IntoIterator,
{
    let mut rows = Vec::new();
    for (parent, children) in pairs {
        rows.extend(children.into_iter().map(|child| (parent.clone(), child)));
    }
    rows
}

/// Like [`explode`], mapping each child through `resolve`; stops at the
/// first error.
pub fn explode_with<K, I, U, E>(
    pairs: impl IntoIterator<Item = (K, I)>,
    mut resolve: impl FnMut(&K, I::Item) -> Result<U, E>,
) -> Result<Vec<(K, U)>, E>
where
    K: Clone,
    I: IntoIterator,
{
    let mut rows = Vec::new();
    for (parent, children) in pairs {
        for child in children {
            let value = resolve(&parent, child)?;
            rows.push((parent.clone(), value));
        }
    }
    Ok(rows)
}
