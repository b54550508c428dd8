pub mod vertex_client;

pub use vertex_client::VertexInferenceClient;
