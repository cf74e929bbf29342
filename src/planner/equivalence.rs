use std::collections::{BTreeMap, BTreeSet};

use crate::models::Ingredient;

/// Disjoint-set forest over interned names.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // Path halving
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Maps raw ingredient names to a canonical representative.
///
/// Equivalence classes are the connected components of the graph whose edges
/// are the declared groups; the representative is the lexicographically
/// smallest name in each component. The result does not depend on the order
/// groups were declared in.
#[derive(Debug, Clone, Default)]
pub struct IngredientResolver {
    canonical: BTreeMap<String, String>,
}

impl IngredientResolver {
    /// Build from groups of mutually equivalent names.
    ///
    /// A pair `(a, b)` is simply a group of two.
    pub fn from_groups<G, S>(groups: G) -> Self
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let groups: Vec<Vec<String>> = groups
            .into_iter()
            .map(|g| {
                g.into_iter()
                    .map(|s| s.as_ref().trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .collect();

        // Intern in sorted order so ids are independent of declaration order
        let names: Vec<&String> = groups
            .iter()
            .flatten()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: BTreeMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();

        let mut uf = UnionFind::new(names.len());
        for group in &groups {
            let mut members = group.iter().map(|n| index[n.as_str()]);
            if let Some(first) = members.next() {
                for other in members {
                    uf.union(first, other);
                }
            }
        }

        // Names are visited in ascending order, so the first name seen for a
        // root is the component minimum.
        let mut representative: BTreeMap<usize, usize> = BTreeMap::new();
        for i in 0..names.len() {
            let root = uf.find(i);
            representative.entry(root).or_insert(i);
        }

        let canonical = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let root = uf.find(i);
                ((*name).clone(), names[representative[&root]].clone())
            })
            .collect();

        Self { canonical }
    }

    /// Build from ingredient reference data (name plus declared equivalents).
    pub fn from_ingredients(ingredients: &[Ingredient]) -> Self {
        Self::from_groups(ingredients.iter().map(|ing| ing.names()))
    }

    /// Canonical name for `name`. Unknown names map to themselves.
    pub fn canonicalize<'a>(&'a self, name: &'a str) -> &'a str {
        self.canonical
            .get(name.trim())
            .map(String::as_str)
            .unwrap_or(name)
    }

    /// Equivalence classes with more than one member, keyed by representative.
    pub fn classes(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut classes: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (name, rep) in &self.canonical {
            classes.entry(rep.as_str()).or_default().push(name.as_str());
        }
        classes.retain(|_, members| members.len() > 1);
        classes
    }

    /// Number of distinct canonical names known to the resolver.
    pub fn class_count(&self) -> usize {
        self.canonical.values().collect::<BTreeSet<_>>().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitive_pairs_share_class() {
        let resolver = IngredientResolver::from_groups([["b", "a"], ["c", "b"]]);
        assert_eq!(resolver.canonicalize("a"), "a");
        assert_eq!(resolver.canonicalize("b"), "a");
        assert_eq!(resolver.canonicalize("c"), "a");
    }

    #[test]
    fn test_unknown_name_maps_to_itself() {
        let resolver = IngredientResolver::from_groups([["onion", "scallion"]]);
        assert_eq!(resolver.canonicalize("garlic"), "garlic");
    }

    #[test]
    fn test_idempotent() {
        let resolver = IngredientResolver::from_groups([["pork", "minced pork"], ["pork", "ground pork"]]);
        for name in ["pork", "minced pork", "ground pork", "beef"] {
            let once = resolver.canonicalize(name);
            assert_eq!(resolver.canonicalize(once), once);
        }
    }

    #[test]
    fn test_order_independent() {
        let forward = IngredientResolver::from_groups(vec![
            vec!["x", "y"],
            vec!["y", "z"],
            vec!["p", "q"],
        ]);
        let backward = IngredientResolver::from_groups(vec![
            vec!["q", "p"],
            vec!["z", "y"],
            vec!["y", "x"],
        ]);
        for name in ["x", "y", "z", "p", "q"] {
            assert_eq!(forward.canonicalize(name), backward.canonicalize(name));
        }
        assert_eq!(forward.class_count(), 2);
    }

    #[test]
    fn test_bridging_group_merges_components() {
        // Two classes joined only through a later group
        let resolver = IngredientResolver::from_groups(vec![
            vec!["soy sauce", "shoyu"],
            vec!["tamari", "dark soy"],
            vec!["shoyu", "tamari"],
        ]);
        let classes = resolver.classes();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes["dark soy"].len(), 4);
        assert_eq!(resolver.canonicalize("soy sauce"), resolver.canonicalize("dark soy"));
    }

    #[test]
    fn test_from_ingredients() {
        let ingredients = vec![Ingredient {
            name: "spring onion".to_string(),
            equivalents: vec!["green onion".to_string()],
            packaging: vec![],
        }];
        let resolver = IngredientResolver::from_ingredients(&ingredients);
        assert_eq!(resolver.canonicalize("spring onion"), "green onion");
    }
}
