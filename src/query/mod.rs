//! Relational query layer over a built model.
//!
//! - [`relations`] - "get X for Y" traversals with name/entity selection
//! - [`lookup`] - Name lookups with a resume index, instance search
//! - [`identity`] - Self-identification and security group chain names
//!
//! Every relation takes a [`Selection`] (which names are wanted) and a
//! [`Want`] (what kind of output is wanted) and returns a [`QueryResult`]
//! whose entity list is an owned copy.

pub mod identity;
pub mod lookup;
pub mod relations;

pub use identity::{
    find_self_cluster, find_self_node, secgroup_chain_name, ChainHasher, LocalAddress,
    Sha256ChainHasher, StaticLocalAddresses,
};
pub use lookup::{
    find_instance, find_secgroup, find_secondary_interfaces, get_dhcp_option_set, get_interface,
    get_nat_gateway, get_network_acl, get_route_table, get_secgroup, get_vpc, get_vpc_subnet,
};
pub use relations::{
    cloud_get_clusters, cloud_get_secgroups, cluster_get_instances, cluster_get_nodes,
    cluster_get_secgroups, instance_get_secgroups, node_get_instances, node_get_secgroups,
    secgroup_get_instances, secgroup_get_interfaces, vpc_get_interfaces,
    vpc_subnet_get_interfaces,
};

/// Wildcard accepted by [`Selection::from_names`].
pub const WILDCARD: &str = "*";

/// Which entities a relation should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    All,
    /// Only entities whose name is in the list.
    Names(&'a [&'a str]),
}

impl<'a> Selection<'a> {
    /// An empty list or a list starting with `*` selects everything.
    pub fn from_names(names: &'a [&'a str]) -> Selection<'a> {
        match names.first() {
            None => Selection::All,
            Some(first) if *first == WILDCARD => Selection::All,
            Some(_) => Selection::Names(names),
        }
    }

    pub fn admits(&self, name: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Names(names) => names.iter().any(|n| *n == name),
        }
    }
}

/// Which outputs the caller wants filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Want {
    Names,
    Entities,
    Both,
}

impl Want {
    pub fn names(&self) -> bool {
        matches!(self, Want::Names | Want::Both)
    }

    pub fn entities(&self) -> bool {
        matches!(self, Want::Entities | Want::Both)
    }
}

/// Output of a relation. A field is `Some` exactly when it was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult<T> {
    pub names: Option<Vec<String>>,
    pub entities: Option<Vec<T>>,
}

impl<T> QueryResult<T> {
    /// Empty result shaped by `want`.
    pub fn empty(want: Want) -> Self {
        QueryResult {
            names: want.names().then(Vec::new),
            entities: want.entities().then(Vec::new),
        }
    }

    /// Record one match. `entity` is `None` when the name does not resolve;
    /// the name is still reported.
    pub fn push(&mut self, name: &str, entity: Option<&T>)
    where
        T: Clone,
    {
        if let Some(names) = self.names.as_mut() {
            names.push(name.to_string());
        }
        if let (Some(entities), Some(entity)) = (self.entities.as_mut(), entity) {
            entities.push(entity.clone());
        }
    }

    /// Number of matches, taken from whichever list was requested.
    pub fn len(&self) -> usize {
        match (&self.names, &self.entities) {
            (Some(names), _) => names.len(),
            (None, Some(entities)) => entities.len(),
            (None, None) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> &[String] {
        self.names.as_deref().unwrap_or_default()
    }

    pub fn entities(&self) -> &[T] {
        self.entities.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_from_names() {
        assert_eq!(Selection::from_names(&[]), Selection::All);
        assert_eq!(Selection::from_names(&["*", "a"]), Selection::All);
        let names = ["a", "b"];
        let sel = Selection::from_names(&names);
        assert!(sel.admits("b"));
        assert!(!sel.admits("c"));
        assert!(Selection::All.admits("anything"));
    }

    #[test]
    fn test_result_shape_follows_want() {
        let mut names_only: QueryResult<u32> = QueryResult::empty(Want::Names);
        names_only.push("a", Some(&1));
        assert_eq!(names_only.names(), ["a".to_string()]);
        assert!(names_only.entities.is_none());

        let mut both: QueryResult<u32> = QueryResult::empty(Want::Both);
        both.push("a", Some(&1));
        both.push("b", None);
        assert_eq!(both.len(), 2);
        assert_eq!(both.entities(), [1]);
    }
}
