pub mod chart;
pub mod corpus_list;
pub mod menu;
pub mod results;
pub mod typing_area;
