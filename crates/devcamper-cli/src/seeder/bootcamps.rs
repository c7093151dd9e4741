//! Fake bootcamps with their courses and reviews.
//!
//! Locations are scattered around Boston so radius searches against the
//! seeded data return something.

use std::time::Instant;

use devcamper_models::bootcamps::{DEFAULT_PHOTO, slugify};
use devcamper_models::courses::average_cost;
use devcamper_models::{BootcampId, Career, CourseId, MinimumSkill, ReviewId};
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StreetName, ZipCode};
use fake::faker::boolean::en::Boolean;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::LastName;
use sqlx::{Postgres, QueryBuilder, Transaction};

use super::models::{BootcampSeed, CourseSeed, ReviewSeed, SeedConfig, UserSeed};

const BATCH_SIZE: usize = 1000;

const SKILLS: [MinimumSkill; 3] = [
    MinimumSkill::Beginner,
    MinimumSkill::Intermediate,
    MinimumSkill::Advanced,
];

fn truncate(text: String, max: usize) -> String {
    text.chars().take(max).collect()
}

/// A non-empty subset of the career list.
fn pick_careers() -> Vec<String> {
    let careers: Vec<String> = Career::ALL
        .iter()
        .filter(|_| Boolean(40).fake::<bool>())
        .map(|career| career.as_str().to_string())
        .collect();

    if careers.is_empty() {
        vec![Career::WebDevelopment.as_str().to_string()]
    } else {
        careers
    }
}

pub fn generate_courses(bootcamp: &BootcampSeed, count: usize) -> Vec<CourseSeed> {
    (0..count)
        .map(|idx| CourseSeed {
            bootcamp_id: bootcamp.id,
            user_id: bootcamp.user_id,
            title: truncate(Sentence(2..5).fake(), 80),
            description: truncate(Paragraph(1..3).fake(), 500),
            weeks: (4..16).fake(),
            tuition: ((20..200).fake::<i32>() * 100) as f64,
            minimum_skill: SKILLS[idx % SKILLS.len()],
            scholarship_available: Boolean(30).fake(),
        })
        .collect()
}

/// Reviews by `count` distinct reviewers, rotating through `reviewers`
/// so each bootcamp gets a different set.
pub fn generate_reviews(
    bootcamp_idx: usize,
    bootcamp: &BootcampSeed,
    reviewers: &[UserSeed],
    count: usize,
) -> Vec<ReviewSeed> {
    if reviewers.is_empty() {
        return Vec::new();
    }

    (0..count.min(reviewers.len()))
        .map(|k| ReviewSeed {
            bootcamp_id: bootcamp.id,
            user_id: reviewers[(bootcamp_idx + k) % reviewers.len()].id,
            title: truncate(Sentence(2..6).fake(), 100),
            text: Paragraph(1..2).fake(),
            rating: (1..=10).fake(),
        })
        .collect()
}

/// One bootcamp per publisher, plus its courses and reviews. Bootcamp
/// averages are computed from the generated rows.
pub fn generate_catalog(
    publishers: &[UserSeed],
    reviewers: &[UserSeed],
    config: &SeedConfig,
) -> (Vec<BootcampSeed>, Vec<CourseSeed>, Vec<ReviewSeed>) {
    let mut bootcamps = Vec::with_capacity(publishers.len());
    let mut courses = Vec::new();
    let mut reviews = Vec::new();

    for (idx, publisher) in publishers.iter().enumerate() {
        let founder: String = LastName().fake();
        let city: String = CityName().fake();
        let tag = publisher.id.into_inner().simple().to_string();
        let name = truncate(format!("{} Code Academy {}", founder, &tag[..6]), 50);
        let slug = slugify(&name);

        let mut bootcamp = BootcampSeed {
            id: BootcampId::new(),
            user_id: publisher.id,
            description: truncate(Paragraph(2..4).fake(), 500),
            website: format!("https://{}.example.com", slug),
            phone: format!("(617) 555-{:04}", (0..10_000).fake::<u32>()),
            email: format!("enroll@{}.example.com", slug),
            latitude: (42.20..42.50).fake(),
            longitude: (-71.30..-70.95).fake(),
            street: format!(
                "{} {}",
                BuildingNumber().fake::<String>(),
                StreetName().fake::<String>()
            ),
            city,
            state: "MA".to_string(),
            zipcode: ZipCode().fake(),
            careers: pick_careers(),
            housing: Boolean(50).fake(),
            job_assistance: Boolean(50).fake(),
            job_guarantee: Boolean(20).fake(),
            accept_gi: Boolean(50).fake(),
            average_cost: None,
            average_rating: None,
            name,
        };

        let bootcamp_courses = generate_courses(&bootcamp, config.courses_per_bootcamp);
        let bootcamp_reviews =
            generate_reviews(idx, &bootcamp, reviewers, config.reviews_per_bootcamp);

        let tuitions: Vec<f64> = bootcamp_courses.iter().map(|c| c.tuition).collect();
        bootcamp.average_cost = average_cost(&tuitions);
        bootcamp.average_rating = (!bootcamp_reviews.is_empty()).then(|| {
            bootcamp_reviews.iter().map(|r| r.rating as f64).sum::<f64>()
                / bootcamp_reviews.len() as f64
        });

        courses.extend(bootcamp_courses);
        reviews.extend(bootcamp_reviews);
        bootcamps.push(bootcamp);
    }

    (bootcamps, courses, reviews)
}

pub async fn insert_bootcamps(
    tx: &mut Transaction<'_, Postgres>,
    bootcamps: &[BootcampSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let mut inserted = 0;

    for chunk in bootcamps.chunks(BATCH_SIZE) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO bootcamps (id, user_id, name, slug, description, website, phone, email,
                location_lat, location_lng, location_formatted_address, location_street,
                location_city, location_state, location_zipcode, location_country, careers,
                average_cost, average_rating, photo, housing, job_assistance, job_guarantee,
                accept_gi) ",
        );
        builder.push_values(chunk, |mut row, b| {
            row.push_bind(b.id)
                .push_bind(b.user_id)
                .push_bind(b.name.clone())
                .push_bind(slugify(&b.name))
                .push_bind(b.description.clone())
                .push_bind(b.website.clone())
                .push_bind(b.phone.clone())
                .push_bind(b.email.clone())
                .push_bind(b.latitude)
                .push_bind(b.longitude)
                .push_bind(format!(
                    "{}, {}, {} {}, US",
                    b.street, b.city, b.state, b.zipcode
                ))
                .push_bind(b.street.clone())
                .push_bind(b.city.clone())
                .push_bind(b.state.clone())
                .push_bind(b.zipcode.clone())
                .push_bind("US")
                .push_bind(b.careers.clone())
                .push_bind(b.average_cost)
                .push_bind(b.average_rating)
                .push_bind(DEFAULT_PHOTO)
                .push_bind(b.housing)
                .push_bind(b.job_assistance)
                .push_bind(b.job_guarantee)
                .push_bind(b.accept_gi);
        });
        inserted += builder.build().execute(&mut **tx).await?.rows_affected();
    }

    println!(
        "   ✓ Inserted {} bootcamps in {:?}",
        inserted,
        start_time.elapsed()
    );
    Ok(inserted)
}

pub async fn insert_courses(
    tx: &mut Transaction<'_, Postgres>,
    courses: &[CourseSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let mut inserted = 0;

    for chunk in courses.chunks(BATCH_SIZE) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO courses (id, title, description, weeks, tuition, minimum_skill,
                scholarship_available, bootcamp_id, user_id) ",
        );
        builder.push_values(chunk, |mut row, c| {
            row.push_bind(CourseId::new())
                .push_bind(c.title.clone())
                .push_bind(c.description.clone())
                .push_bind(c.weeks)
                .push_bind(c.tuition)
                .push_bind(c.minimum_skill)
                .push_bind(c.scholarship_available)
                .push_bind(c.bootcamp_id)
                .push_bind(c.user_id);
        });
        inserted += builder.build().execute(&mut **tx).await?.rows_affected();
    }

    println!("   ✓ Inserted {} courses in {:?}", inserted, start_time.elapsed());
    Ok(inserted)
}

pub async fn insert_reviews(
    tx: &mut Transaction<'_, Postgres>,
    reviews: &[ReviewSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let mut inserted = 0;

    for chunk in reviews.chunks(BATCH_SIZE) {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO reviews (id, title, text, rating, bootcamp_id, user_id) ",
        );
        builder.push_values(chunk, |mut row, r| {
            row.push_bind(ReviewId::new())
                .push_bind(r.title.clone())
                .push_bind(r.text.clone())
                .push_bind(r.rating)
                .push_bind(r.bootcamp_id)
                .push_bind(r.user_id);
        });
        inserted += builder.build().execute(&mut **tx).await?.rows_affected();
    }

    println!("   ✓ Inserted {} reviews in {:?}", inserted, start_time.elapsed());
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeder::users::generate_users;
    use devcamper_models::Role;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_respects_schema_rules() {
        let publishers = generate_users(4, Role::Publisher, "hash");
        let reviewers = generate_users(3, Role::User, "hash");
        let config = SeedConfig::new(4).with_courses(2).with_reviews(5);

        let (bootcamps, courses, reviews) = generate_catalog(&publishers, &reviewers, &config);

        assert_eq!(bootcamps.len(), 4);
        assert_eq!(courses.len(), 8);
        // capped by the number of reviewers
        assert_eq!(reviews.len(), 12);

        let owners: HashSet<_> = bootcamps.iter().map(|b| b.user_id).collect();
        assert_eq!(owners.len(), 4);

        let pairs: HashSet<_> = reviews.iter().map(|r| (r.bootcamp_id, r.user_id)).collect();
        assert_eq!(pairs.len(), reviews.len());

        for bootcamp in &bootcamps {
            assert!(bootcamp.name.chars().count() <= 50);
            assert!(bootcamp.description.chars().count() <= 500);
            assert!(!bootcamp.careers.is_empty());
            assert!(bootcamp.average_cost.is_some());
            let rating = bootcamp.average_rating.unwrap();
            assert!((1.0..=10.0).contains(&rating));
        }
    }

    #[test]
    fn test_no_reviewers_means_no_reviews() {
        let publishers = generate_users(2, Role::Publisher, "hash");
        let (bootcamps, _, reviews) =
            generate_catalog(&publishers, &[], &SeedConfig::new(2).with_courses(0));

        assert!(reviews.is_empty());
        assert!(bootcamps.iter().all(|b| b.average_rating.is_none()));
        assert!(bootcamps.iter().all(|b| b.average_cost.is_none()));
    }
}
