use crate::error::{AppError, Result};
use crate::models::{Coordinates, PathPoint};

const POLYLINE_PRECISION: f64 = 1e5;

/// Decode a Google encoded polyline (precision 5) into coordinates.
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinates>> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat = accumulate(lat, next_delta(bytes, &mut index)?)?;
        lng = accumulate(lng, next_delta(bytes, &mut index)?)?;
        let point = Coordinates::new(
            lat as f64 / POLYLINE_PRECISION,
            lng as f64 / POLYLINE_PRECISION,
        )
        .map_err(|e| AppError::PolylineDecode(format!("Point {} out of range: {}", points.len(), e)))?;
        points.push(point);
    }

    Ok(points)
}

fn accumulate(total: i64, delta: i64) -> Result<i64> {
    total
        .checked_add(delta)
        .ok_or_else(|| AppError::PolylineDecode("Coordinate overflow".to_string()))
}

/// Read one zigzag-encoded varint starting at `index`.
fn next_delta(bytes: &[u8], index: &mut usize) -> Result<i64> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| AppError::PolylineDecode("Truncated polyline".to_string()))?;
        if !(63..=126).contains(&byte) {
            return Err(AppError::PolylineDecode(format!(
                "Invalid character '{}' at position {}",
                byte as char, *index
            )));
        }
        *index += 1;

        let chunk = (byte - 63) as i64;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
        if shift > 60 {
            return Err(AppError::PolylineDecode("Value overflow".to_string()));
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Decode a route path, treating an empty or malformed polyline as no path.
pub fn decode_path(encoded: &str) -> Vec<Coordinates> {
    if encoded.is_empty() {
        return Vec::new();
    }
    match decode_polyline(encoded) {
        Ok(points) => points,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to decode route polyline: {}", e);
            Vec::new()
        }
    }
}

/// Pick at most roughly `max_samples` evenly strided points along a path.
///
/// Short paths (n <= max_samples) are returned whole. Longer paths take
/// every `n / max_samples`-th point from the start, and the final point is
/// always included with progress 100.
pub fn sample_path(points: &[Coordinates], max_samples: usize) -> Vec<PathPoint> {
    let n = points.len();
    let progress = |index: usize| {
        if n <= 1 {
            0.0
        } else {
            index as f64 / (n - 1) as f64 * 100.0
        }
    };
    let point_at = |index: usize| PathPoint {
        coordinates: points[index],
        index,
        progress: progress(index),
    };

    if n <= max_samples.max(1) {
        return (0..n).map(point_at).collect();
    }

    let stride = n / max_samples.max(1);
    let mut samples: Vec<PathPoint> = (0..n).step_by(stride).map(point_at).collect();

    let last = n - 1;
    match samples.last_mut() {
        Some(tail) if tail.index == last => tail.progress = 100.0,
        _ => samples.push(PathPoint {
            coordinates: points[last],
            index: last,
            progress: 100.0,
        }),
    }

    samples
}
