//! Static catalog data plus the optional store-backed movie override.
//! Catalog fetch failures degrade to the static lists rather than failing
//! the session.

use serde::Deserialize;
use tracing::warn;

use crate::models::movie_model::{Experience, Movie, ShowDate, Showtime};
use crate::models::snack_model::{Discount, Offer, Snack};
use crate::store::{Condition, DocumentStore};

pub fn movies() -> Vec<Movie> {
    vec![
        Movie {
            id: "m1".to_string(),
            title: "Interstellar Odyssey".to_string(),
            genre: "Sci-Fi / Adventure".to_string(),
            duration: "2h 49m".to_string(),
            rating: "9.2".to_string(),
            image_url: "https://picsum.photos/300/450?random=1".to_string(),
            description: "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival.".to_string(),
        },
        Movie {
            id: "m2".to_string(),
            title: "Neon Nights".to_string(),
            genre: "Cyberpunk / Action".to_string(),
            duration: "1h 55m".to_string(),
            rating: "8.7".to_string(),
            image_url: "https://picsum.photos/300/450?random=2".to_string(),
            description: "In a dystopian future, a lone hacker must infiltrate the mega-corp citadel to uncover the truth.".to_string(),
        },
        Movie {
            id: "m3".to_string(),
            title: "The Silent Forest".to_string(),
            genre: "Horror / Thriller".to_string(),
            duration: "1h 32m".to_string(),
            rating: "7.5".to_string(),
            image_url: "https://picsum.photos/300/450?random=3".to_string(),
            description: "A weekend getaway turns into a nightmare when ancient spirits awaken in the woods.".to_string(),
        },
        Movie {
            id: "m4".to_string(),
            title: "Love in Paris".to_string(),
            genre: "Romance / Drama".to_string(),
            duration: "2h 10m".to_string(),
            rating: "8.1".to_string(),
            image_url: "https://picsum.photos/300/450?random=4".to_string(),
            description: "Two strangers meet by chance under the Eiffel Tower and spend a life-changing day together.".to_string(),
        },
        Movie {
            id: "m5".to_string(),
            title: "Velocity X".to_string(),
            genre: "Action / Racing".to_string(),
            duration: "2h 05m".to_string(),
            rating: "7.9".to_string(),
            image_url: "https://picsum.photos/300/450?random=5".to_string(),
            description: "Underground street racers compete for the ultimate prize in a high-stakes cross-country rally.".to_string(),
        },
    ]
}

pub fn showtimes() -> Vec<Showtime> {
    let entry = |id: &str, time: &str, experience, date, theater: &str| Showtime {
        id: id.to_string(),
        time: time.to_string(),
        experience,
        date,
        theater: theater.to_string(),
    };
    vec![
        entry("s1", "14:30", Experience::Standard, ShowDate::Today, "Grand Cinema - Hall 3"),
        entry("s2", "16:45", Experience::Imax, ShowDate::Today, "Grand Cinema - IMAX Hall"),
        entry("s3", "19:00", Experience::Dolby, ShowDate::Today, "Grand Cinema - Dolby Atmos"),
        entry("s4", "21:30", Experience::Imax, ShowDate::Today, "Grand Cinema - IMAX Hall"),
        entry("s5", "11:00", Experience::Standard, ShowDate::Tomorrow, "Grand Cinema - Hall 2"),
        entry("s6", "15:15", Experience::Dolby, ShowDate::Tomorrow, "Grand Cinema - Dolby Atmos"),
    ]
}

pub fn snacks() -> Vec<Snack> {
    let entry = |id: &str, name: &str, price, description: &str, image_url: &str, category: &str| Snack {
        id: id.to_string(),
        name: name.to_string(),
        price,
        description: description.to_string(),
        image_url: image_url.to_string(),
        category: category.to_string(),
    };
    vec![
        entry(
            "sn1",
            "Large Popcorn",
            8.50,
            "Freshly popped, buttered & salted.",
            "https://images.unsplash.com/photo-1578849278619-e73505e9610f?auto=format&fit=crop&q=80&w=200",
            "Food",
        ),
        entry(
            "sn2",
            "Cola Large",
            5.00,
            "Ice cold refreshing cola.",
            "https://images.unsplash.com/photo-1622483767028-3f66f32aef97?auto=format&fit=crop&q=80&w=200",
            "Drink",
        ),
        entry(
            "sn3",
            "Nachos Deluxe",
            9.75,
            "Tortilla chips with hot cheese dip & jalapeños.",
            "https://images.unsplash.com/photo-1513456852971-30c0b8199d4d?auto=format&fit=crop&q=80&w=200",
            "Food",
        ),
        entry(
            "sn4",
            "Combo Meal",
            15.00,
            "1 Large Popcorn + 2 Medium Drinks.",
            "https://images.unsplash.com/photo-1585647347483-22b66260dfff?auto=format&fit=crop&q=80&w=200",
            "Combo",
        ),
    ]
}

pub fn offers() -> Vec<Offer> {
    vec![
        Offer {
            id: "o1".to_string(),
            code: "WELCOME50".to_string(),
            description: "Get 50% off up to $10 on your first booking".to_string(),
            discount: Discount::Percent(0.5),
            min_order_value: Some(20.0),
        },
        Offer {
            id: "o2".to_string(),
            code: "SNACKFREE".to_string(),
            description: "$5 off on snacks orders above $15".to_string(),
            discount: Discount::Fixed(5.0),
            min_order_value: Some(15.0),
        },
    ]
}

pub fn showtime_by_id(id: &str) -> Option<Showtime> {
    showtimes().into_iter().find(|s| s.id == id)
}

pub fn offer_by_code(code: &str) -> Option<Offer> {
    offers().into_iter().find(|o| o.code == code)
}

/// Movie document as stored in the `movies` collection override.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMovie {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    genre: String,
    duration: String,
    rating: String,
    image_url: String,
    description: String,
}

impl From<StoredMovie> for Movie {
    fn from(stored: StoredMovie) -> Self {
        Movie {
            id: stored.id,
            title: stored.title,
            genre: stored.genre,
            duration: stored.duration,
            rating: stored.rating,
            image_url: stored.image_url,
            description: stored.description,
        }
    }
}

/// Active movies from the store when any exist, otherwise the static list.
pub async fn movies_with_fallback<S: DocumentStore>(store: &S) -> Vec<Movie> {
    match store
        .query("movies", &[Condition::eq("isActive", true)], None, None)
        .await
    {
        Ok(documents) if !documents.is_empty() => {
            let mut result = Vec::with_capacity(documents.len());
            for document in documents {
                match mongodb::bson::from_document::<StoredMovie>(document) {
                    Ok(stored) => result.push(stored.into()),
                    Err(e) => {
                        warn!("skipping malformed movie document: {e}");
                    }
                }
            }
            if result.is_empty() {
                movies()
            } else {
                result
            }
        }
        Ok(_) => movies(),
        Err(e) => {
            warn!("movie catalog unavailable, using static list: {e}");
            movies()
        }
    }
}

/// Single movie lookup, static catalog first, then the store override.
pub async fn movie_by_id<S: DocumentStore>(store: &S, movie_id: &str) -> Option<Movie> {
    if let Some(movie) = movies().into_iter().find(|m| m.id == movie_id) {
        return Some(movie);
    }
    movies_with_fallback(store)
        .await
        .into_iter()
        .find(|m| m.id == movie_id)
}
