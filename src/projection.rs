/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![warn(clippy::all)]
#![warn(missing_docs)]

//! The projection module converts between WGS84 longitude/latitude and the metric plane used for
//! lengths, areas and intersection tests.

use crate::config;

/// Lambert azimuthal equal-area projection on an ellipsoid (EPSG method 9820).
#[derive(Clone, Debug)]
pub struct Laea {
    e: f64,
    e2: f64,
    qp: f64,
    rq: f64,
    d: f64,
    sin_beta0: f64,
    cos_beta0: f64,
    lat0: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Laea {
    /// Creates a projection from the ellipsoid and the projection origin, angles in degrees.
    pub fn new(
        semi_major_axis: f64,
        inverse_flattening: f64,
        lat0: f64,
        lon0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let f = 1.0 / inverse_flattening;
        let e2 = 2.0 * f - f * f;
        let e = e2.sqrt();
        let lat0 = lat0.to_radians();

        let qp = authalic_q(e, std::f64::consts::FRAC_PI_2);
        let beta0 = (authalic_q(e, lat0) / qp).asin();
        let rq = semi_major_axis * (qp / 2.0).sqrt();
        let d = semi_major_axis * (lat0.cos() / (1.0 - e2 * lat0.sin().powi(2)).sqrt())
            / (rq * beta0.cos());

        Laea {
            e,
            e2,
            qp,
            rq,
            d,
            sin_beta0: beta0.sin(),
            cos_beta0: beta0.cos(),
            lat0,
            lon0: lon0.to_radians(),
            false_easting,
            false_northing,
        }
    }

    /// ETRS89 / LAEA Europe (EPSG:3035), GRS80 ellipsoid.
    pub fn etrs89() -> Self {
        Laea::new(6378137.0, 298.257222101, 52.0, 10.0, 4321000.0, 3210000.0)
    }

    /// Longitude/latitude in degrees -> easting/northing in meters.
    pub fn forward(&self, coord: geo::Coord<f64>) -> geo::Coord<f64> {
        let lambda = coord.x.to_radians() - self.lon0;
        let phi = coord.y.to_radians();
        let beta = (authalic_q(self.e, phi) / self.qp).clamp(-1.0, 1.0).asin();
        let (sin_beta, cos_beta) = beta.sin_cos();
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let b = self.rq
            * (2.0
                / (1.0 + self.sin_beta0 * sin_beta + self.cos_beta0 * cos_beta * cos_lambda))
                .sqrt();
        geo::Coord {
            x: self.false_easting + b * self.d * cos_beta * sin_lambda,
            y: self.false_northing
                + (b / self.d)
                    * (self.cos_beta0 * sin_beta - self.sin_beta0 * cos_beta * cos_lambda),
        }
    }

    /// Easting/northing in meters -> longitude/latitude in degrees.
    pub fn inverse(&self, coord: geo::Coord<f64>) -> geo::Coord<f64> {
        let x = coord.x - self.false_easting;
        let y = coord.y - self.false_northing;
        let rho = ((x / self.d).powi(2) + (self.d * y).powi(2)).sqrt();
        if rho == 0.0 {
            return geo::Coord {
                x: self.lon0.to_degrees(),
                y: self.lat0.to_degrees(),
            };
        }

        let c = 2.0 * (rho / (2.0 * self.rq)).clamp(-1.0, 1.0).asin();
        let (sin_c, cos_c) = c.sin_cos();
        let beta = (cos_c * self.sin_beta0 + (self.d * y * sin_c * self.cos_beta0) / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lambda = self.lon0
            + (x * sin_c).atan2(
                self.d * rho * self.cos_beta0 * cos_c
                    - self.d * self.d * y * self.sin_beta0 * sin_c,
            );

        let e4 = self.e2 * self.e2;
        let e6 = e4 * self.e2;
        let phi = beta
            + (self.e2 / 3.0 + 31.0 * e4 / 180.0 + 517.0 * e6 / 5040.0) * (2.0 * beta).sin()
            + (23.0 * e4 / 360.0 + 251.0 * e6 / 3780.0) * (4.0 * beta).sin()
            + (761.0 * e6 / 45360.0) * (6.0 * beta).sin();

        geo::Coord {
            x: lambda.to_degrees(),
            y: phi.to_degrees(),
        }
    }

    /// Projects a WGS84 geometry to the metric plane.
    pub fn project<G>(&self, geometry: &G) -> G::Output
    where
        G: geo::MapCoords<f64, f64>,
    {
        geometry.map_coords(|coord| self.forward(coord))
    }

    /// Projects a metric geometry back to WGS84.
    pub fn unproject<G>(&self, geometry: &G) -> G::Output
    where
        G: geo::MapCoords<f64, f64>,
    {
        geometry.map_coords(|coord| self.inverse(coord))
    }
}

/// The q term of the authalic latitude, for eccentricity `e` and latitude `phi` in radians.
fn authalic_q(e: f64, phi: f64) -> f64 {
    let e2 = e * e;
    let sin_phi = phi.sin();
    (1.0 - e2)
        * (sin_phi / (1.0 - e2 * sin_phi * sin_phi)
            - (1.0 / (2.0 * e)) * ((1.0 - e * sin_phi) / (1.0 + e * sin_phi)).ln())
}

/// Creates the projection a configuration asks for.
pub fn from_config(projection: config::Projection) -> Laea {
    match projection {
        config::Projection::Etrs89Laea => Laea::etrs89(),
    }
}

/// Length of projected lines, in km.
pub fn length_km(lines: &geo::MultiLineString<f64>) -> f64 {
    let meters: f64 = lines
        .iter()
        .flat_map(|line_string| line_string.lines())
        .map(|line| line.dx().hypot(line.dy()))
        .sum();
    meters / 1000.0
}

/// Area of a projected polygon collection, in km².
pub fn area_km2(polygons: &geo::MultiPolygon<f64>) -> f64 {
    use geo::Area as _;
    polygons.unsigned_area() / 1_000_000.0
}
