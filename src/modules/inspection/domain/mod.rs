pub mod repository_name;
