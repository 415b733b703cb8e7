#![allow(dead_code)]

use std::path::Path;

use mbrowser::db;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

pub const MOVIES_CSV: &str = "\u{feff}Rank,Title,Genre,Description,Director,Actors,Year,Runtime (Minutes),Rating,Votes,Revenue (Millions),Metascore
1,Guardians of the Galaxy,\"Action,Adventure,Sci-Fi\",A group of intergalactic criminals.,James Gunn,\"Chris Pratt, Vin Diesel, Bradley Cooper, Zoe Saldana\",2014,121,8.1,757074,333.13,76
2,Prometheus,\"Adventure,Mystery,Sci-Fi\",Following clues to the origin of mankind.,Ridley Scott,\"Noomi Rapace, Logan Marshall-Green, Michael Fassbender, Charlize Theron\",2012,124,7,485820,126.46,65
3,Split,\"Horror,Thriller\",Three girls are kidnapped.,M. Night Shyamalan,\"James McAvoy, Anya Taylor-Joy, Haley Lu Richardson, Jessica Sula\",2016,117,7.3,157606,138.12,62
4,The Martian,\"Adventure,Drama,Sci-Fi\",An astronaut becomes stranded on Mars.,Ridley Scott,\"Matt Damon, Jessica Chastain, Kristen Wiig, Kate Mara\",2015,144,8,556097,228.43,80
5,Passengers,\"Adventure,Drama,Romance\",A spacecraft traveling to a distant colony.,Morten Tyldum,\"Jennifer Lawrence, Chris Pratt, Michael Sheen, Laurence Fishburne\",2016,116,7,192177,100.01,41
";

pub const USERS_CSV: &str = "id,username,password
1,thorke,kenthorke1
2,fmercury,mvmercury2
";

pub const REVIEWS_CSV: &str = "id,user_id,movie_id,review,timestamp
1,1,4,\"Science the heck out of it, great fun\",2020-02-28 14:31:26
2,2,4,Too long,2020-03-01 09:00:00
3,2,1,Loved the soundtrack,2020-02-29 18:00:00
";

/// A migrated SQLite database in a temporary directory. Keep the `TempDir`
/// alive for as long as the connection is used.
pub async fn test_db() -> (TempDir, DatabaseConnection) {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("mbrowser.db").display());
    let db = db::connect_and_migrate(&url, false).await.unwrap();
    (dir, db)
}

pub fn write_file(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

/// Writes the movie, user and review fixtures into `dir`.
pub fn write_fixtures(dir: &Path) {
    write_file(dir, "Data1000Movies.csv", MOVIES_CSV);
    write_file(dir, "users.csv", USERS_CSV);
    write_file(dir, "reviews.csv", REVIEWS_CSV);
}
