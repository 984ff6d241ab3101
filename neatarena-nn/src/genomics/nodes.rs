use crate::NodeId;

use serde::{Deserialize, Serialize};

/// A NodeType indicates the function of
/// the node's network equivalent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Input nodes. Their values are set from outside
    /// the network and they never receive connections.
    Input,
    /// Hidden nodes.
    Hidden,
    /// Output nodes. They never originate connections.
    Output,
}

impl NodeType {
    /// Returns whether the node type is part of
    /// the fixed input/output boundary of a genome.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::NodeType;
    ///
    /// assert!(NodeType::Input.is_boundary());
    /// assert!(NodeType::Output.is_boundary());
    /// assert!(!NodeType::Hidden.is_boundary());
    /// ```
    pub fn is_boundary(self) -> bool {
        self != NodeType::Hidden
    }
}

/// Nodes are the structural elements of genomes
/// between which genes are created.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    node_type: NodeType,
}

impl Node {
    /// Generate a new node with the passed parameters.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{Node, NodeType};
    ///
    /// let node = Node::new(5, NodeType::Hidden);
    /// ```
    pub fn new(id: NodeId, node_type: NodeType) -> Node {
        Node { id, node_type }
    }

    /// Returns the node's ID.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{Node, NodeType};
    ///
    /// let node = Node::new(5, NodeType::Hidden);
    ///
    /// assert_eq!(node.id(), 5);
    /// ```
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node's type.
    ///
    /// # Examples
    /// ```
    /// use neatarena_nn::genomics::{Node, NodeType};
    ///
    /// let node = Node::new(5, NodeType::Output);
    ///
    /// assert_eq!(node.node_type(), NodeType::Output);
    /// ```
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Returns whether a gene may start at this node.
    pub fn can_emit(&self) -> bool {
        self.node_type != NodeType::Output
    }

    /// Returns whether a gene may end at this node.
    pub fn can_receive(&self) -> bool {
        self.node_type != NodeType::Input
    }
}
