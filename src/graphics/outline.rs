//! Shape tracing for suit artwork: largest external contour, polygon
//! simplification, periodic spline smoothing, and fitting into a canvas.

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;
use thiserror::Error;

/// Gauss-Seidel sweeps used by the smoother.
const SMOOTHING_ITERATIONS: usize = 500;
const SMOOTHING_TOLERANCE: f64 = 1e-9;
/// Bisection steps when searching for the coarsest usable tolerance.
const TOLERANCE_SEARCH_STEPS: usize = 48;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutlineError {
    #[error("no shape found in the artwork")]
    NoContours,
    #[error("largest shape is too small to outline")]
    Degenerate,
}

/// A smoothed outline and its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub points: Vec<Point<f64>>,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    fn of(points: &[Point<f64>]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in points {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Trace the largest external shape of a binary mask (non-zero pixels are
/// ink) and return `resolution` points along its smoothed, closed outline.
///
/// `smoothness` sets both the simplification tolerance (as a fraction of
/// the contour perimeter) and the weight of the spline smoothing.
pub fn outline_from_mask(
    mask: &GrayImage,
    smoothness: f64,
    resolution: usize,
) -> Result<Outline, OutlineError> {
    let contour = largest_external_contour(mask)?;
    if contour.len() < 3 || polygon_area(&contour) <= 0.0 {
        return Err(OutlineError::Degenerate);
    }

    let epsilon = smoothness * arc_length(&contour, true);
    let simplified = simplify_closed(&contour, epsilon);

    let vertices: Vec<Point<f64>> = simplified
        .iter()
        .map(|p| Point::new(p.x as f64, p.y as f64))
        .collect();
    let weight = smoothness * vertices.len() as f64;
    let smoothed = smooth_closed(&vertices, weight);
    let points = resample_closed(&smoothed, resolution).ok_or(OutlineError::Degenerate)?;
    let bounds = Bounds::of(&points).ok_or(OutlineError::Degenerate)?;
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Err(OutlineError::Degenerate);
    }
    Ok(Outline { points, bounds })
}

fn largest_external_contour(mask: &GrayImage) -> Result<Vec<Point<i32>>, OutlineError> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer))
        .map(|c| c.points)
        .max_by(|a, b| polygon_area(a).total_cmp(&polygon_area(b)))
        .ok_or(OutlineError::NoContours)
}

/// Douglas-Peucker simplification of a closed contour that never drops
/// below a triangle.
///
/// A tolerance too coarse to leave three vertices is lowered to the
/// coarsest one that does, so a larger tolerance never yields more vertices.
fn simplify_closed(contour: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if epsilon <= 0.0 || epsilon.is_nan() {
        return contour.to_vec();
    }
    let simplified = approximate_polygon_dp(contour, epsilon, true);
    if simplified.len() >= 3 {
        return simplified;
    }

    let (mut usable, mut collapsed) = (0.0, epsilon);
    for _ in 0..TOLERANCE_SEARCH_STEPS {
        let mid = (usable + collapsed) / 2.0;
        if approximate_polygon_dp(contour, mid, true).len() >= 3 {
            usable = mid;
        } else {
            collapsed = mid;
        }
    }
    if usable > 0.0 {
        approximate_polygon_dp(contour, usable, true)
    } else {
        contour.to_vec()
    }
}

/// Unsigned shoelace area of a closed polygon.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0i64;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    (twice as f64 / 2.0).abs()
}

/// Periodic penalized least-squares smoothing: solves
/// `(I + w * DᵀD) z = y` per axis, where `D` is the cyclic second difference.
fn smooth_closed(points: &[Point<f64>], weight: f64) -> Vec<Point<f64>> {
    let n = points.len();
    if n < 5 || weight <= 0.0 {
        return points.to_vec();
    }
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let xs = solve_cyclic_penta(&xs, weight);
    let ys = solve_cyclic_penta(&ys, weight);
    xs.into_iter().zip(ys).map(|(x, y)| Point::new(x, y)).collect()
}

fn solve_cyclic_penta(y: &[f64], weight: f64) -> Vec<f64> {
    let n = y.len();
    let diag = 1.0 + 6.0 * weight;
    let mut z = y.to_vec();
    for _ in 0..SMOOTHING_ITERATIONS {
        let mut delta: f64 = 0.0;
        for i in 0..n {
            let at = |k: isize| z[(i as isize + k).rem_euclid(n as isize) as usize];
            let off = -4.0 * (at(-1) + at(1)) + (at(-2) + at(2));
            let next = (y[i] - weight * off) / diag;
            delta = delta.max((next - z[i]).abs());
            z[i] = next;
        }
        if delta < SMOOTHING_TOLERANCE {
            break;
        }
    }
    z
}

/// Sample `count` points along a closed Catmull-Rom spline through
/// `points`, spaced evenly in chord-length parameter. The closing point is
/// not repeated.
fn resample_closed(points: &[Point<f64>], count: usize) -> Option<Vec<Point<f64>>> {
    let n = points.len();
    let mut cumulative = Vec::with_capacity(n + 1);
    cumulative.push(0.0);
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let last = cumulative[i];
        cumulative.push(last + ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt());
    }
    let total = cumulative[n];
    if total <= 0.0 {
        return None;
    }

    let mut out = Vec::with_capacity(count);
    let mut segment = 0;
    for s in 0..count {
        let u = total * s as f64 / count as f64;
        while segment + 1 < n && cumulative[segment + 1] <= u {
            segment += 1;
        }
        let length = cumulative[segment + 1] - cumulative[segment];
        let t = if length > 0.0 {
            (u - cumulative[segment]) / length
        } else {
            0.0
        };
        let p0 = points[(segment + n - 1) % n];
        let p1 = points[segment];
        let p2 = points[(segment + 1) % n];
        let p3 = points[(segment + 2) % n];
        out.push(catmull_rom(p0, p1, p2, p3, t));
    }
    Some(out)
}

fn catmull_rom(p0: Point<f64>, p1: Point<f64>, p2: Point<f64>, p3: Point<f64>, t: f64) -> Point<f64> {
    let t2 = t * t;
    let t3 = t2 * t;
    let blend = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b + (c - a) * t + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (3.0 * b - a - 3.0 * c + d) * t3)
    };
    Point::new(
        blend(p0.x, p1.x, p2.x, p3.x),
        blend(p0.y, p1.y, p2.y, p3.y),
    )
}

/// Uniformly scale and translate an outline so its bounds sit centered in a
/// `width` x `height` canvas, preserving aspect ratio.
pub fn fit_to_canvas(outline: &Outline, width: u32, height: u32) -> Vec<Point<f64>> {
    let bounds = outline.bounds;
    let scale = (width as f64 / bounds.width()).min(height as f64 / bounds.height());
    let offset_x = (width as f64 - bounds.width() * scale) / 2.0;
    let offset_y = (height as f64 - bounds.height() * scale) / 2.0;
    outline
        .points
        .iter()
        .map(|p| {
            Point::new(
                (p.x - bounds.min_x) * scale + offset_x,
                (p.y - bounds.min_y) * scale + offset_y,
            )
        })
        .collect()
}
