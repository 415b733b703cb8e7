mod common;

use jiff::Timestamp;
use mbrowser::{
    Repository,
    models::{NewMovie, NewReview},
    services,
};
use sea_orm::DatabaseConnection;

async fn seed(repo: &Repository<DatabaseConnection>) {
    let gotg = repo
        .add_movie(NewMovie::new("Guardians of the Galaxy", 2014).with_description("Space."))
        .await
        .unwrap();
    let prometheus = repo.add_movie(NewMovie::new("Prometheus", 2012)).await.unwrap();
    let martian = repo.add_movie(NewMovie::new("The Martian", 2015)).await.unwrap();
    let split = repo.add_movie(NewMovie::new("Split", 2016)).await.unwrap();

    let scifi = repo.add_genre("Sci-Fi").await.unwrap();
    let horror = repo.add_genre("Horror").await.unwrap();
    for movie in [&martian, &gotg, &prometheus] {
        repo.attach_genre(movie.id, scifi.id).await.unwrap();
    }
    repo.attach_genre(split.id, horror.id).await.unwrap();

    let scott = repo.add_director("Ridley Scott").await.unwrap();
    let gunn = repo.add_director("James Gunn").await.unwrap();
    repo.attach_director(martian.id, scott.id).await.unwrap();
    repo.attach_director(prometheus.id, scott.id).await.unwrap();
    repo.attach_director(gotg.id, gunn.id).await.unwrap();

    let fassbender = repo.add_actor("Michael Fassbender").await.unwrap();
    repo.attach_actor(prometheus.id, fassbender.id).await.unwrap();
}

#[tokio::test]
async fn inserted_rows_are_retrievable_by_id() {
    let (_dir, db) = common::test_db().await;
    let repo = Repository::new(db);

    let movie = repo
        .add_movie(NewMovie::new("Arrival", 2016).with_description("Linguist meets aliens."))
        .await
        .unwrap();

    let fetched = repo.get_movie(movie.id).await.unwrap().unwrap();
    assert_eq!(fetched, movie);
    assert_eq!(fetched.title, "Arrival");
    assert_eq!(fetched.release_year, 2016);
    assert_eq!(fetched.description, "Linguist meets aliens.");

    let user = repo.add_user("thorke", "$argon2id$fake").await.unwrap();
    assert_eq!(repo.get_user("thorke").await.unwrap(), Some(user));
}

#[tokio::test]
async fn explicit_movie_ids_are_kept() {
    let (_dir, db) = common::test_db().await;
    let repo = Repository::new(db);

    let movie = NewMovie { id: Some(42), ..NewMovie::new("Hitchhiker", 2005) };
    assert_eq!(repo.add_movie(movie).await.unwrap().id, 42);
    assert!(repo.get_movie(42).await.unwrap().is_some());
}

#[tokio::test]
async fn lookup_misses_are_empty_not_errors() {
    let (_dir, db) = common::test_db().await;
    let repo = Repository::new(db);

    assert!(repo.get_movie(999).await.unwrap().is_none());
    assert!(repo.get_user("nobody").await.unwrap().is_none());
    assert!(repo.get_first_movie().await.unwrap().is_none());
    assert!(repo.get_last_movie().await.unwrap().is_none());
    assert!(repo.get_movie_details(1).await.unwrap().is_none());
    assert!(repo.get_movie_ids_for_genre("Western").await.unwrap().is_empty());
    assert!(repo.get_movie_ids_for_director("Nobody").await.unwrap().is_empty());
    assert!(repo.get_movie_ids_for_actor("Nobody").await.unwrap().is_empty());
    assert!(repo.get_movies_by_id(&[]).await.unwrap().is_empty());
    assert_eq!(repo.get_number_of_movies().await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (_dir, db) = common::test_db().await;
    let repo = Repository::new(db);

    repo.add_user("fmercury", "hash-a").await.unwrap();
    let err = repo.add_user("fmercury", "hash-b").await.unwrap_err();

    assert!(err.is_unique_violation(), "unexpected error: {err}");
    assert_eq!(repo.get_user("fmercury").await.unwrap().unwrap().password, "hash-a");
}

#[tokio::test]
async fn counts_first_last_and_id_lists() {
    let (_dir, db) = common::test_db().await;
    let repo = Repository::new(db);
    seed(&repo).await;

    assert_eq!(repo.get_number_of_movies().await.unwrap(), 4);
    assert_eq!(repo.get_first_movie().await.unwrap().unwrap().title, "Guardians of the Galaxy");
    assert_eq!(repo.get_last_movie().await.unwrap().unwrap().title, "Split");
    assert_eq!(repo.get_movie_ids().await.unwrap(), vec![1, 2, 3, 4]);

    let titles: Vec<_> = repo
        .get_movies_by_id(&[3, 1, 77])
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(titles, vec!["Guardians of the Galaxy", "The Martian"]);
}

#[tokio::test]
async fn filters_movies_by_release_year() {
    let (_dir, db) = common::test_db().await;
    let repo = Repository::new(db);
    seed(&repo).await;

    assert_eq!(repo.get_movies_by_release_year(None).await.unwrap().len(), 4);

    let in_2012 = repo.get_movies_by_release_year(Some(2012)).await.unwrap();
    assert_eq!(in_2012.len(), 1);
    assert_eq!(in_2012[0].title, "Prometheus");

    assert!(repo.get_movies_by_release_year(Some(1927)).await.unwrap().is_empty());
}

#[tokio::test]
async fn movie_ids_by_name_are_ascending() {
    let (_dir, db) = common::test_db().await;
    let repo = Repository::new(db);
    seed(&repo).await;

    assert_eq!(repo.get_movie_ids_for_genre("Sci-Fi").await.unwrap(), vec![1, 2, 3]);
    assert_eq!(repo.get_movie_ids_for_genre("Horror").await.unwrap(), vec![4]);
    assert_eq!(repo.get_movie_ids_for_director("Ridley Scott").await.unwrap(), vec![2, 3]);
    assert_eq!(repo.get_movie_ids_for_actor("Michael Fassbender").await.unwrap(), vec![2]);
}

#[tokio::test]
async fn reviews_require_existing_user_and_movie() {
    let (_dir, db) = common::test_db().await;
    let repo = Repository::new(db);
    seed(&repo).await;
    let user = repo.add_user("thorke", "hash").await.unwrap();

    let unknown_user = NewReview {
        user_id: 99,
        movie_id: 1,
        review: "Nope".to_string(),
        timestamp: None,
    };
    let err = repo.add_review(unknown_user).await.unwrap_err();
    assert!(err.to_string().contains("unknown user 99"));

    let unknown_movie = NewReview {
        user_id: user.id,
        movie_id: 99,
        review: "Nope".to_string(),
        timestamp: None,
    };
    let err = repo.add_review(unknown_movie).await.unwrap_err();
    assert!(err.to_string().contains("unknown movie 99"));

    assert!(repo.get_reviews().await.unwrap().is_empty());
}

#[tokio::test]
async fn movie_details_collect_related_rows() {
    let (_dir, db) = common::test_db().await;
    let repo = Repository::new(db);
    seed(&repo).await;
    let user = repo.add_user("thorke", "hash").await.unwrap();

    let later: Timestamp = "2021-01-02T00:00:00Z".parse().unwrap();
    let earlier: Timestamp = "2020-06-01T12:00:00Z".parse().unwrap();
    for (text, at) in [("Rewatched", later), ("Stunning", earlier)] {
        repo.add_review(NewReview {
            user_id: user.id,
            movie_id: 2,
            review: text.to_string(),
            timestamp: Some(at),
        })
        .await
        .unwrap();
    }

    let details = repo.get_movie_details(2).await.unwrap().unwrap();
    assert_eq!(details.movie.title, "Prometheus");
    assert_eq!(details.genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(), ["Sci-Fi"]);
    assert_eq!(details.directors[0].name, "Ridley Scott");
    assert_eq!(details.actors[0].name, "Michael Fassbender");

    let reviews: Vec<_> = details.reviews.iter().map(|r| r.review.as_str()).collect();
    assert_eq!(reviews, ["Stunning", "Rewatched"]);
    assert_eq!(details.reviews[0].posted_at(), Some(earlier));

    assert_eq!(repo.get_reviews_for_movie(2).await.unwrap().len(), 2);
    assert!(repo.get_reviews_for_movie(1).await.unwrap().is_empty());

    let json = serde_json::to_value(&details).unwrap();
    assert_eq!(json["title"], "Prometheus");
    assert_eq!(json["directors"][0]["name"], "Ridley Scott");
}

#[tokio::test]
async fn name_listings_and_random_picks() {
    let (_dir, db) = common::test_db().await;
    let repo = Repository::new(db);
    seed(&repo).await;

    assert_eq!(services::genre_names(&repo).await.unwrap(), ["Sci-Fi", "Horror"]);
    assert_eq!(services::director_full_names(&repo).await.unwrap(), ["Ridley Scott", "James Gunn"]);
    assert_eq!(services::actor_full_names(&repo).await.unwrap(), ["Michael Fassbender"]);

    let picked = services::random_movies(&repo, 2).await.unwrap();
    assert_eq!(picked.len(), 2);
    assert_ne!(picked[0].movie_id, picked[1].movie_id);

    let everything = services::random_movies(&repo, 50).await.unwrap();
    let ids: Vec<_> = everything.iter().map(|m| m.movie_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let martian = everything.iter().find(|m| m.title == "The Martian").unwrap();
    assert_eq!(martian.directors, ["Ridley Scott"]);
    assert!(everything.iter().find(|m| m.title == "Split").unwrap().directors.is_empty());
}
