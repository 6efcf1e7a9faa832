pub mod comments;
pub mod images;
pub mod locations;
pub mod plant_locations;
pub mod plant_tags;
pub mod plants;
pub mod tags;
pub mod users;
