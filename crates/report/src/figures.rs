//! The eleven report figures.
//!
//! Each aggregation result gets a fixed title, axis labels, chart kind and,
//! for three of them, a clamped value axis.

use crate::chart::{ChartBackend, ChartData, ChartHandle, ChartKind, ChartSpec, render};
use crate::error::Result;
use analytics::ReportData;
use tracing::{debug, info};

/// Build the chart specs for every figure, in report order.
pub fn build_figures(data: &ReportData) -> Vec<ChartSpec> {
    vec![
        ChartSpec::new(
            "Fig 1: User composition by age groups and gender",
            ChartKind::GroupedBar,
            ChartData::Table(data.users_by_age_and_gender.to_f64()),
        )
        .x_label("User Age groups")
        .legend_title("Gender"),
        ChartSpec::new(
            "Fig 2: User composition by age and occupation",
            ChartKind::StackedBar,
            ChartData::Table(data.users_by_occupation_and_age.to_f64()),
        )
        .x_label("User Occupations")
        .legend_title("Age Groups"),
        ChartSpec::new(
            "Fig 3: Genres of movies in dataset",
            ChartKind::Pie,
            ChartData::Series(data.movies_per_genre.to_f64()),
        ),
        ChartSpec::new(
            "Fig 4: Co-occurring genres in movies",
            ChartKind::MaskedHeatmap,
            ChartData::Matrix(data.genre_cooccurrence.clone()),
        ),
        ChartSpec::new(
            "Fig 5: Frequencies of rating levels",
            ChartKind::StackedBar,
            ChartData::Table(data.ratings_by_value_and_gender.to_f64()),
        )
        .x_label("Rating Levels")
        .y_label("#")
        .legend_title("Gender"),
        ChartSpec::new(
            "Fig 6: Most rated movies (popular movies)",
            ChartKind::GroupedBar,
            ChartData::bars(&data.most_rated_movies.to_f64(), "# Ratings"),
        )
        .x_label("Movies")
        .y_label("# Ratings"),
        ChartSpec::new(
            "Fig 7: Best rated movies (Avg ratings for movies with more than 500 ratings)",
            ChartKind::GroupedBar,
            ChartData::bars(&data.best_rated_movies, "Avg Ratings"),
        )
        .x_label("Movies")
        .y_label("Avg Ratings")
        .y_range(4.4, 4.6),
        ChartSpec::new(
            "Fig 8: Number of ratings received by genres",
            ChartKind::StackedBar,
            ChartData::Table(data.ratings_by_genre_and_gender.to_f64()),
        )
        .x_label("Genres")
        .y_label("# Ratings")
        .legend_title("Gender"),
        ChartSpec::new(
            "Fig 9: Average ratings received for genres",
            ChartKind::GroupedBar,
            ChartData::Table(data.mean_rating_by_genre_and_gender.clone()),
        )
        .x_label("Genres")
        .y_label("Avg rating")
        .legend_title("Gender")
        .y_range(2.0, 5.0),
        ChartSpec::new(
            "Fig 10: Unique active users (who have given rating) per year",
            ChartKind::GroupedBar,
            ChartData::Table(data.active_users_by_year_and_gender.to_f64()),
        )
        .x_label("Year")
        .y_label("# Active users")
        .legend_title("Gender"),
        ChartSpec::new(
            "Fig 11: Average ratings for genres per year",
            ChartKind::GroupedBar,
            ChartData::Table(data.mean_rating_by_year_and_genre.clone()),
        )
        .x_label("Year")
        .y_label("Average rating")
        .legend_title("Genres")
        .y_range(2.5, 4.5),
    ]
}

/// Render every spec in order. The first failure aborts the run.
pub fn render_all(specs: &[ChartSpec], backend: &dyn ChartBackend) -> Result<Vec<ChartHandle>> {
    info!("Rendering {} charts with {}", specs.len(), backend.name());

    let mut charts = Vec::with_capacity(specs.len());
    for spec in specs {
        debug!("Rendering '{}' as {}", spec.title, spec.kind);
        charts.push(render(spec, backend)?);
    }
    Ok(charts)
}
