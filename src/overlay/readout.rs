use crate::types::LaneFitResult;

/// The four readout lines drawn on each successful frame.
pub fn readout_lines(fit: &LaneFitResult) -> [String; 4] {
    let (left, right) = fit.curvature();
    let offset = fit.vehicle_offset();
    let side = if offset < 0.0 { "Left" } else { "Right" };
    [
        format!("Radius of curvature (left) = {:.1} km", left / 1000.0),
        format!("Radius of curvature (right) = {:.1} km", right / 1000.0),
        format!("Radius of curvature (avg) = {:.1} km", fit.average_curvature() / 1000.0),
        format!("Vehicle is {:.1} m {side} from the lane center", offset.abs()),
    ]
}
