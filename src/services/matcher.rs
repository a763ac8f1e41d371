use std::collections::HashSet;

use crate::{
    models::{Movie, MovieId},
    services::{catalog::Catalog, normalizer::normalize},
};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Resolves free text to a single movie by normalized title
///
/// The first catalog match wins when several titles normalize identically.
pub fn resolve_exact<'a>(query: &str, catalog: &'a Catalog) -> Option<&'a Movie> {
    let needle = normalize(query);
    if needle.is_empty() {
        return None;
    }

    catalog
        .entries()
        .iter()
        .find(|e| e.normalized_title == needle)
        .map(|e| &e.movie)
}

/// Autocomplete candidates: titles containing `query`, ignoring case only
///
/// Punctuation is not stripped here, so `"spider-man"` matches
/// `"Spider-Man 2"` but `"spiderman"` does not.
pub fn suggest<'a>(
    query: &str,
    catalog: &'a Catalog,
    exclude_ids: &HashSet<MovieId>,
    limit: usize,
) -> Vec<&'a Movie> {
    let needle = query.to_lowercase();
    let needle = needle.trim();
    if needle.is_empty() {
        return Vec::new();
    }

    catalog
        .entries()
        .iter()
        .filter(|e| e.lowercase_title.contains(needle))
        .filter(|e| !exclude_ids.contains(&e.movie.movie_id))
        .take(limit)
        .map(|e| &e.movie)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(titles: &[(&str, &str)]) -> Catalog {
        Catalog::from_movies(
            titles
                .iter()
                .map(|(id, title)| Movie {
                    movie_id: MovieId::from(*id),
                    title: title.to_string(),
                    genres: None,
                })
                .collect(),
        )
    }

    fn ids(movies: &[&Movie]) -> Vec<String> {
        movies.iter().map(|m| m.movie_id.to_string()).collect()
    }

    #[test]
    fn test_resolve_exact_ignores_case_and_punctuation() {
        let catalog = catalog(&[("1", "The Matrix"), ("2", "Matrix Reloaded")]);
        assert_eq!(
            resolve_exact("the matrix", &catalog).unwrap().movie_id,
            MovieId::from("1")
        );
        assert_eq!(
            resolve_exact("THE MATRIX!!", &catalog).unwrap().movie_id,
            MovieId::from("1")
        );
    }

    #[test]
    fn test_resolve_exact_requires_full_title() {
        let catalog = catalog(&[("1", "The Matrix")]);
        assert!(resolve_exact("matrix", &catalog).is_none());
    }

    #[test]
    fn test_resolve_exact_empty_query() {
        let catalog = catalog(&[("1", "The Matrix"), ("2", "!!!")]);
        assert!(resolve_exact("", &catalog).is_none());
        // A symbols-only query normalizes to empty and must not match "!!!"
        assert!(resolve_exact("?", &catalog).is_none());
    }

    #[test]
    fn test_resolve_exact_first_occurrence_wins() {
        let catalog = catalog(&[("10", "Solaris"), ("11", "Solaris!")]);
        assert_eq!(
            resolve_exact("solaris", &catalog).unwrap().movie_id,
            MovieId::from("10")
        );
    }

    #[test]
    fn test_suggest_catalog_order() {
        let catalog = catalog(&[("1", "The Matrix"), ("2", "Matrix Reloaded")]);
        let found = suggest("matrix", &catalog, &HashSet::new(), DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(ids(&found), vec!["1", "2"]);
    }

    #[test]
    fn test_suggest_case_insensitive_substring() {
        let catalog = catalog(&[
            ("1", "The Matrix"),
            ("2", "Dogma"),
            ("3", "Heat"),
            ("4", "MATILDA"),
        ]);
        let found = suggest("mat", &catalog, &HashSet::new(), DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(ids(&found), vec!["1", "4"]);
    }

    #[test]
    fn test_suggest_does_not_strip_punctuation() {
        let catalog = catalog(&[("1", "Spider-Man 2")]);
        assert_eq!(
            suggest("spider-man", &catalog, &HashSet::new(), 10).len(),
            1
        );
        assert!(suggest("spiderman", &catalog, &HashSet::new(), 10).is_empty());
    }

    #[test]
    fn test_suggest_excludes_ids() {
        let catalog = catalog(&[("1", "The Matrix"), ("2", "Matrix Reloaded")]);
        let exclude: HashSet<MovieId> = [MovieId::from("1")].into_iter().collect();
        let found = suggest("matrix", &catalog, &exclude, DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(ids(&found), vec!["2"]);
    }

    #[test]
    fn test_suggest_caps_results() {
        let titles: Vec<(String, String)> = (0..25)
            .map(|i| (i.to_string(), format!("Matrix Part {}", i)))
            .collect();
        let refs: Vec<(&str, &str)> = titles
            .iter()
            .map(|(id, t)| (id.as_str(), t.as_str()))
            .collect();
        let catalog = catalog(&refs);

        let found = suggest("mat", &catalog, &HashSet::new(), DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(found.len(), 10);
        assert_eq!(found[0].movie_id, MovieId::from("0"));
        assert_eq!(found[9].movie_id, MovieId::from("9"));
    }

    #[test]
    fn test_suggest_limit_applies_after_exclusion() {
        let catalog = catalog(&[("1", "Alien"), ("2", "Aliens"), ("3", "Alien 3")]);
        let exclude: HashSet<MovieId> = [MovieId::from("1")].into_iter().collect();
        let found = suggest("alien", &catalog, &exclude, 2);
        assert_eq!(ids(&found), vec!["2", "3"]);
    }

    #[test]
    fn test_suggest_empty_query() {
        let catalog = catalog(&[("1", "The Matrix")]);
        assert!(suggest("", &catalog, &HashSet::new(), 10).is_empty());
        assert!(suggest("   ", &catalog, &HashSet::new(), 10).is_empty());
    }

    #[test]
    fn test_suggest_trims_query() {
        let catalog = catalog(&[("1", "The Matrix")]);
        assert_eq!(suggest("  matrix ", &catalog, &HashSet::new(), 10).len(), 1);
    }
}
