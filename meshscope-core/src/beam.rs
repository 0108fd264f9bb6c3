use crate::scan::BeamQualityMatrix;

/// Degrees per beam index step.
const BEAM_ANGLE_STEP: f64 = 1.5;
/// Angle of beam index zero.
const BEAM_ANGLE_OFFSET: f64 = -45.0;

/// Convert a link quality metric (LQM) to signal-to-noise ratio, in dB.
pub fn lqm_to_snr(lqm: i32) -> f64 {
    (lqm as f64 - 256.0) / 8.0
}

/// Convert a beam index to beam angle, in degrees.
pub fn beam_index_to_angle(beam_index: i32) -> f64 {
    beam_index as f64 * BEAM_ANGLE_STEP + BEAM_ANGLE_OFFSET
}

/// Best beam pair for one responder.
///
/// All fields are `None` when nothing in the matrix carried a measurement,
/// which is not the same as a real 0 dB link.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BeamSelection {
    pub best_snr_db: Option<f64>,
    pub best_tx_angle_deg: Option<f64>,
    pub best_rx_angle_deg: Option<f64>,
}

impl BeamSelection {
    pub fn has_signal(&self) -> bool {
        self.best_snr_db.is_some()
    }
}

struct Candidate {
    lqm: i32,
    tx_angle: f64,
    rx_angle: f64,
    combined_angle: f64,
}

/// Search the matrix for the highest LQM, preferring the pair with the
/// smallest combined absolute angle when LQMs tie.
pub fn select_best_beam(matrix: &BeamQualityMatrix) -> BeamSelection {
    let mut best: Option<Candidate> = None;

    for (&tx_beam, rx_lqms) in matrix {
        let tx_angle = beam_index_to_angle(tx_beam);
        for (&rx_beam, &lqm) in rx_lqms {
            if lqm <= 0 {
                continue;
            }

            let rx_angle = beam_index_to_angle(rx_beam);
            let combined_angle = tx_angle.abs() + rx_angle.abs();

            let better = match &best {
                None => true,
                Some(b) => lqm > b.lqm || (lqm == b.lqm && combined_angle < b.combined_angle),
            };

            if better {
                best = Some(Candidate {
                    lqm,
                    tx_angle,
                    rx_angle,
                    combined_angle,
                });
            }
        }
    }

    match best {
        Some(b) => BeamSelection {
            best_snr_db: Some(lqm_to_snr(b.lqm)),
            best_tx_angle_deg: Some(b.tx_angle),
            best_rx_angle_deg: Some(b.rx_angle),
        },
        None => BeamSelection::default(),
    }
}
