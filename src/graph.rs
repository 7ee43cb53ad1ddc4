//! Bridge from pull-model nodes into a `dasp_graph` processing graph.
//!
//! `dasp_graph` pushes fixed 64-frame blocks through a petgraph, one
//! [`Buffer`] per channel. [`GraphSource`] wraps any [`AudioNode`] (usually a
//! [`Redistributor`](crate::nodes::Redistributor)) so it can sit at the leaves
//! of such a graph.

use alloc::boxed::Box;
use alloc::vec;

use dasp_graph::{Buffer, Input, Node, NodeData};

use crate::node::AudioNode;

/// The petgraph layout `dasp_graph` processes.
pub type Graph<T> = petgraph::graph::Graph<NodeData<T>, ()>;

/// Processor for a [`Graph`].
pub type Processor<T> = dasp_graph::Processor<Graph<T>>;

/// A pull-model node seen as a `dasp_graph` source.
///
/// Every `process` pulls one block of interleaved frames and splits it into
/// per-channel buffers. Frames past a short read are silent.
pub struct GraphSource<N> {
    node: N,
    channels: usize,
    scratch: Box<[f32]>,
}

impl<N: AudioNode> GraphSource<N> {
    pub fn new(node: N) -> Self {
        let channels = node.channels().max(1);
        Self {
            node,
            channels,
            scratch: vec![0.0; Buffer::LEN * channels].into_boxed_slice(),
        }
    }

    /// Wrap `node` with one output buffer per channel, ready for `add_node`.
    pub fn node_data(node: N) -> NodeData<Self> {
        let source = Self::new(node);
        let buffers = vec![Buffer::SILENT; source.channels];
        NodeData::new(source, buffers)
    }

    pub fn inner(&self) -> &N {
        &self.node
    }

    pub fn into_inner(self) -> N {
        self.node
    }
}

impl<N: AudioNode> Node for GraphSource<N> {
    fn process(&mut self, _inputs: &[Input], output: &mut [Buffer]) {
        let ch = self.channels;
        let got = self.node.read(&mut self.scratch, Buffer::LEN).min(Buffer::LEN);

        for (c, buffer) in output.iter_mut().enumerate() {
            if c >= ch {
                buffer.silence();
                continue;
            }
            for (i, sample) in buffer.iter_mut().enumerate() {
                *sample = if i < got { self.scratch[i * ch + c] } else { 0.0 };
            }
        }
    }
}
