use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string_len(Movies::Title, 255))
                    .col(integer(Movies::ReleaseYear))
                    .col(string_len(Movies::Description, 1024))
                    .col(integer_null(Movies::RuntimeMinutes))
                    .col(double_null(Movies::Rating))
                    .col(big_integer_null(Movies::Votes))
                    .col(double_null(Movies::RevenueMillions))
                    .col(integer_null(Movies::Metascore))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_release_year")
                    .table(Movies::Table)
                    .col(Movies::ReleaseYear)
                    .to_owned(),
            )
            .await?;

        for (table, name, index) in [
            (Named::Genres, Named::Name, "idx_genres_name"),
            (Named::Directors, Named::Name, "idx_directors_name"),
            (Named::Actors, Named::Name, "idx_actors_name"),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(pk_auto(Named::Id))
                        .col(string_len(name, 64))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(Index::create().name(index).table(table).col(name).to_owned())
                .await?;
        }

        for (junction, target, target_col, index) in [
            (Junction::MovieGenres, Named::Genres, Junction::GenreId, "idx_movie_genres_genre_movie"),
            (
                Junction::MovieDirectors,
                Named::Directors,
                Junction::DirectorId,
                "idx_movie_directors_director_movie",
            ),
            (Junction::MovieActors, Named::Actors, Junction::ActorId, "idx_movie_actors_actor_movie"),
        ] {
            manager
                .create_table(
                    Table::create()
                        .table(junction)
                        .if_not_exists()
                        .col(pk_auto(Junction::Id))
                        .col(integer(Junction::MovieId))
                        .col(integer(target_col))
                        .foreign_key(
                            ForeignKey::create()
                                .from(junction, Junction::MovieId)
                                .to(Movies::Table, Movies::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .from(junction, target_col)
                                .to(target, Named::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name(index)
                        .table(junction)
                        .col(target_col)
                        .col(Junction::MovieId)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for junction in [Junction::MovieActors, Junction::MovieDirectors, Junction::MovieGenres] {
            manager.drop_table(Table::drop().table(junction).to_owned()).await?;
        }
        for table in [Named::Actors, Named::Directors, Named::Genres] {
            manager.drop_table(Table::drop().table(table).to_owned()).await?;
        }
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Movies {
    Table,
    Id,
    Title,
    ReleaseYear,
    Description,
    RuntimeMinutes,
    Rating,
    Votes,
    RevenueMillions,
    Metascore,
}

#[derive(Clone, Copy, DeriveIden)]
enum Named {
    Genres,
    Directors,
    Actors,
    Id,
    Name,
}

#[derive(Clone, Copy, DeriveIden)]
enum Junction {
    MovieGenres,
    MovieDirectors,
    MovieActors,
    Id,
    MovieId,
    GenreId,
    DirectorId,
    ActorId,
}
