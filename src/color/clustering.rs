//! Dominant color extraction by k-means clustering
//!
//! Pixels are subsampled to a bounded set, partitioned with k-means++
//! seeding and Lloyd refinement, and the centroid of the most populated
//! cluster is reported as the dominant color. Several independent attempts
//! are made and the most compact partition wins.
//!
//! All randomness comes from a [`StdRng`] seeded from the configuration, so
//! the same pixels always produce the same dominant color.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::color::conversion::RgbColor;
use crate::config::ClusteringConfig;

type Point = [f32; 3];

/// Result of one clustering run
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub centroids: Vec<RgbColor>,
    /// Members per centroid, same order as `centroids`
    pub counts: Vec<usize>,
    /// Sum of squared distances from each sample to its centroid
    pub compactness: f32,
}

impl Clustering {
    /// Index of the largest cluster; the first one wins on equal counts
    pub fn dominant_index(&self) -> usize {
        let mut best = 0;
        for (i, &count) in self.counts.iter().enumerate() {
            if count > self.counts[best] {
                best = i;
            }
        }
        best
    }

    /// Centroid of the largest cluster
    pub fn dominant(&self) -> RgbColor {
        self.centroids[self.dominant_index()]
    }
}

/// Seeded k-means over RGB pixels
#[derive(Debug, Clone)]
pub struct DominantColorExtractor {
    config: ClusteringConfig,
}

impl DominantColorExtractor {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    /// Dominant color of a pixel set, or `None` when the set is empty
    pub fn dominant_color(&self, pixels: &[[u8; 3]]) -> Option<RgbColor> {
        self.cluster(pixels).map(|c| c.dominant())
    }

    /// Run the full clustering procedure and return the best partition
    pub fn cluster(&self, pixels: &[[u8; 3]]) -> Option<Clustering> {
        if pixels.is_empty() {
            return None;
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let samples = self.subsample(pixels, &mut rng);
        let k = self.config.clusters.clamp(1, samples.len());

        let mut best: Option<Clustering> = None;
        for attempt in 0..self.config.attempts.max(1) {
            let run = self.run_once(&samples, k, &mut rng);
            trace!(attempt, compactness = run.compactness, "Clustering attempt finished");

            let improves = best
                .as_ref()
                .map_or(true, |b| run.compactness < b.compactness);
            if improves {
                best = Some(run);
            }
        }

        best
    }

    /// Uniform random subset of at most `max_samples` pixels, in input order
    fn subsample(&self, pixels: &[[u8; 3]], rng: &mut StdRng) -> Vec<Point> {
        let to_point = |p: &[u8; 3]| [f32::from(p[0]), f32::from(p[1]), f32::from(p[2])];
        let limit = self.config.max_samples.max(1);

        if pixels.len() <= limit {
            return pixels.iter().map(to_point).collect();
        }

        let mut chosen = index::sample(rng, pixels.len(), limit).into_vec();
        chosen.sort_unstable();
        chosen.into_iter().map(|i| to_point(&pixels[i])).collect()
    }

    fn run_once(&self, samples: &[Point], k: usize, rng: &mut StdRng) -> Clustering {
        let mut centroids = seed_centroids(samples, k, rng);
        let mut labels = vec![0usize; samples.len()];

        for _ in 0..self.config.max_iterations {
            assign(samples, &centroids, &mut labels);
            let updated = recompute(samples, &labels, &centroids);

            let shift = centroids
                .iter()
                .zip(&updated)
                .map(|(a, b)| distance_sq(a, b).sqrt())
                .fold(0.0_f32, f32::max);
            centroids = updated;

            if shift < self.config.epsilon {
                break;
            }
        }

        let compactness = assign(samples, &centroids, &mut labels);
        let mut counts = vec![0usize; k];
        for &label in &labels {
            counts[label] += 1;
        }

        Clustering {
            centroids: centroids
                .into_iter()
                .map(|c| RgbColor::new(c[0], c[1], c[2]))
                .collect(),
            counts,
            compactness,
        }
    }
}

/// k-means++ seeding: each new centroid is drawn with probability
/// proportional to its squared distance from the nearest chosen one
fn seed_centroids(samples: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(samples[rng.random_range(0..samples.len())]);

    let mut nearest: Vec<f32> = samples
        .iter()
        .map(|s| distance_sq(s, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f32 = nearest.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.random::<f32>() * total;
            let mut pick = samples.len() - 1;
            for (i, &d) in nearest.iter().enumerate() {
                if target < d {
                    pick = i;
                    break;
                }
                target -= d;
            }
            pick
        } else {
            // Every sample coincides with a centroid already
            rng.random_range(0..samples.len())
        };

        let centroid = samples[next];
        for (d, s) in nearest.iter_mut().zip(samples) {
            *d = d.min(distance_sq(s, &centroid));
        }
        centroids.push(centroid);
    }

    centroids
}

/// Assign each sample to its nearest centroid (lowest index on ties);
/// returns the total squared distance
fn assign(samples: &[Point], centroids: &[Point], labels: &mut [usize]) -> f32 {
    let mut total = 0.0;
    for (sample, label) in samples.iter().zip(labels.iter_mut()) {
        let mut best = 0;
        let mut best_dist = distance_sq(sample, &centroids[0]);
        for (i, centroid) in centroids.iter().enumerate().skip(1) {
            let dist = distance_sq(sample, centroid);
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        *label = best;
        total += best_dist;
    }
    total
}

/// Mean of each cluster's members; an empty cluster keeps its previous centroid
fn recompute(samples: &[Point], labels: &[usize], previous: &[Point]) -> Vec<Point> {
    let mut sums = vec![[0.0_f64; 3]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (sample, &label) in samples.iter().zip(labels) {
        for c in 0..3 {
            sums[label][c] += f64::from(sample[c]);
        }
        counts[label] += 1;
    }

    sums.iter()
        .zip(&counts)
        .zip(previous)
        .map(|((sum, &count), prev)| {
            if count == 0 {
                *prev
            } else {
                let n = count as f64;
                [
                    (sum[0] / n) as f32,
                    (sum[1] / n) as f32,
                    (sum[2] / n) as f32,
                ]
            }
        })
        .collect()
}

fn distance_sq(a: &Point, b: &Point) -> f32 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)
}
