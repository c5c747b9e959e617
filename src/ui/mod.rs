pub mod gene_view;
pub mod panels;
pub mod plot;
pub mod summary;
