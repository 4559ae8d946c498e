//! different utility modules used throughout the project
/// logger setup and saving sampled curves into csv files
pub mod logger;
/// parse task document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3" into HashMap
/// and into a calculus task
pub mod task_parser;
