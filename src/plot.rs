// 📈 Lorenz Plot - curve against the equality diagonal
//
// plotters bitmap backend, saved as a 1200x1200 PNG.

use crate::error::{Result, SurveyError};
use crate::inequality::LorenzPoint;
use plotters::prelude::*;
use std::path::Path;

const SIZE: (u32, u32) = (1200, 1200);

/// Render `points` to `output_path`
///
/// The points must form a valid Lorenz curve (both coordinates within 0..=1).
/// The Gini coefficient is shown in the caption.
pub fn render_lorenz_curve(
    points: &[LorenzPoint],
    gini: f64,
    output_path: &Path,
) -> Result<()> {
    if points.len() < 2 {
        return Err(SurveyError::Plot(
            "a Lorenz curve needs at least two points".to_string(),
        ));
    }

    for p in points {
        if !(0.0..=1.0).contains(&p.population) || !(0.0..=1.0).contains(&p.expenditure) {
            return Err(SurveyError::Plot(format!(
                "point ({:.4}, {:.4}) lies outside the unit square",
                p.population, p.expenditure
            )));
        }
    }

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(output_path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let caption = format!("Lorenz Curve (Gini = {:.4})", gini);
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 40))
        .margin(30)
        .x_label_area_size(70)
        .y_label_area_size(90)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Cumulative Population Share")
        .y_desc("Cumulative Expenditure Share")
        .label_style(("sans-serif", 25))
        .x_label_formatter(&|x| format!("{:.0}%", x * 100.0))
        .y_label_formatter(&|y| format!("{:.0}%", y * 100.0))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(vec![(0.0, 0.0), (1.0, 1.0)], &BLACK))
        .map_err(plot_err)?
        .label("Perfect equality")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK));

    chart
        .draw_series(LineSeries::new(
            points.iter().map(LorenzPoint::as_tuple),
            BLUE.stroke_width(3),
        ))
        .map_err(plot_err)?
        .label("Lorenz curve")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(3)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 25))
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;

    Ok(())
}

fn plot_err<E: std::fmt::Display>(e: E) -> SurveyError {
    SurveyError::Plot(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_curve() {
        let err = render_lorenz_curve(&[LorenzPoint::ORIGIN], 0.0, Path::new("unused.png"))
            .unwrap_err();
        assert!(matches!(err, SurveyError::Plot(_)));
    }

    #[test]
    fn test_rejects_points_outside_unit_square() {
        let points = [
            LorenzPoint::ORIGIN,
            LorenzPoint {
                population: 0.5,
                expenditure: 1.5,
            },
            LorenzPoint::END,
        ];

        let err = render_lorenz_curve(&points, 0.1, Path::new("unused.png")).unwrap_err();
        assert!(err.to_string().contains("outside the unit square"));
    }
}
