use std::path::PathBuf;

use rand::Rng;

use crate::attractor::{analyze_attractor, irreversibility, Attractor, FinalStepStats};
use crate::config::{format_rules, RunConfig};
use crate::error::Result;
use crate::export::{
    save, write_attractor_plot, write_gif_grid, write_hamming_exponent, write_pgm_grid,
    write_plot_int, write_plot_real, ExportConfig, PlotFormat,
};
use crate::grid::Rule;
use crate::hamming::{hamming_exponent, hamming_series};
use crate::simulation::Simulation;

/// Outcome of a run: files produced, Hamming exponents, and rules that failed.
#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<PathBuf>,
    /// Hamming exponent per rule, `None` when not computable.
    pub exponents: Vec<(Rule, Option<f64>)>,
    pub failures: usize,
}

/// Executes the analyses a [`RunConfig`] asks for and writes their artifacts.
pub struct Runner<'a> {
    config: &'a RunConfig,
    export: &'a ExportConfig,
    /// Also write a GIF next to every PGM space-time diagram.
    gif: bool,
    report: RunReport,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a RunConfig, export: &'a ExportConfig) -> Self {
        Self {
            config,
            export,
            gif: false,
            report: RunReport::default(),
        }
    }

    pub fn with_gif(mut self, gif: bool) -> Self {
        self.gif = gif;
        self
    }

    /// Run every enabled analysis for every configured rule.
    ///
    /// A failure for one rule is logged and counted; the remaining rules still run.
    pub fn run<R: Rng>(mut self, rng: &mut R) -> Result<RunReport> {
        let c = self.config;
        log::info!(
            "Rules [{}], {} cells, {} steps, {} initialization",
            format_rules(&c.rules),
            c.cells,
            c.steps,
            c.init
        );

        if c.save_image || c.hamming {
            // One initial row shared by every rule of the run.
            let mut sim = Simulation::with_init(c.steps, c.cells, c.init.mode(), rng)?;
            for &rule in &c.rules {
                let outcome = self.evolve_rule(&mut sim, rule);
                self.record(rule, outcome);
            }
        }

        if c.attractor {
            for &rule in &c.rules {
                let outcome = self.attractor_rule(rule);
                self.record(rule, outcome);
            }
        }

        if c.irreversibility {
            for &rule in &c.rules {
                let outcome = self.irreversibility_rule(rule);
                self.record(rule, outcome);
            }
        }

        Ok(self.report)
    }

    fn record(&mut self, rule: Rule, outcome: Result<()>) {
        if let Err(e) = outcome {
            log::error!("{rule}: {e}");
            self.report.failures += 1;
        }
    }

    fn evolve_rule(&mut self, sim: &mut Simulation, rule: Rule) -> Result<()> {
        let c = self.config;
        log::debug!("Evolving {rule}");
        sim.evolve(rule);

        if c.save_image {
            let name = format!(
                "ACE_R{:03}_C{:05}_P{:05}_{}",
                rule.number(),
                c.cells,
                c.steps,
                c.init
            );
            let path = self.export.path(&format!("{name}.pgm"))?;
            save(&path, |w| write_pgm_grid(w, &name, sim.grid()))?;
            self.wrote(path);

            if self.gif {
                let path = self.export.path(&format!("{name}.gif"))?;
                write_gif_grid(&path, sim.grid(), self.export.cell_scale)?;
                self.wrote(path);
            }
        }

        if c.hamming {
            let series = hamming_series(sim.grid(), rule)?;
            let suffix = format!("R{:03}_C{:05}_P{:05}", rule.number(), c.cells, c.steps);

            let path = self.export.path(&format!("HAMMING_{suffix}.dat"))?;
            save(&path, |w| write_plot_int(w, &series, PlotFormat::default()))?;
            self.wrote(path);

            let exponent = hamming_exponent(&series);
            match &exponent {
                Ok(a) => log::info!("Hamming exponent ({suffix}) is {a:.5}"),
                Err(e) => log::warn!("Hamming exponent ({suffix}) could not be computed: {e}"),
            }
            let path = self.export.path(&format!("HAMMING_EXP_{suffix}.txt"))?;
            save(&path, |w| write_hamming_exponent(w, &exponent))?;
            self.wrote(path);
            self.report.exponents.push((rule, exponent.ok()));
        }
        Ok(())
    }

    fn attractor_rule(&mut self, rule: Rule) -> Result<()> {
        let c = self.config;
        let attractor = analyze_attractor(rule, c.cells, c.steps)?;
        self.save_attractor(&attractor)
    }

    fn save_attractor(&mut self, a: &Attractor) -> Result<()> {
        let suffix = format!("R{:03}_C{:05}_P{:05}", a.rule.number(), a.cells, a.steps);
        log::info!(
            "Attractor {suffix}: {} of {} states reached at the last step",
            a.visited_per_step[a.steps],
            a.state_count()
        );

        let path = self.export.path(&format!("ATRACTOR_{suffix}.dat"))?;
        save(&path, |w| write_attractor_plot(w, a))?;
        self.wrote(path);

        let path = self.export.path(&format!("ATRACTOR_VISITADO_PASO_{suffix}.dat"))?;
        save(&path, |w| {
            write_plot_int(w, &a.visited_per_step, PlotFormat::default())
        })?;
        self.wrote(path);

        let path = self.export.path(&format!("ATRACTOR_ESTADO_VISITADO_{suffix}.dat"))?;
        save(&path, |w| {
            write_plot_int(w, &a.state_visits, PlotFormat::default())
        })?;
        self.wrote(path);

        let entropies = a.entropies();
        let path = self.export.path(&format!("ENTROPIA_{suffix}.dat"))?;
        save(&path, |w| write_plot_real(w, &entropies, PlotFormat::default()))?;
        self.wrote(path);
        Ok(())
    }

    fn irreversibility_rule(&mut self, rule: Rule) -> Result<()> {
        let c = self.config;
        let sweep = irreversibility(rule, c.cell_range.clone(), c.steps)?;
        self.save_irreversibility(rule, &sweep)
    }

    fn save_irreversibility(&mut self, rule: Rule, sweep: &[FinalStepStats]) -> Result<()> {
        let suffix = format!("R{:03}_P{:05}", rule.number(), self.config.steps);
        let x_start = *self.config.cell_range.start() as i64;

        let unreached: Vec<f64> = sweep.iter().map(|s| s.unreached_fraction).collect();
        let path = self.export.path(&format!("NOVISITADOS_{suffix}.dat"))?;
        let format = PlotFormat {
            x_start,
            decimals: 5,
        };
        save(&path, |w| write_plot_real(w, &unreached, format))?;
        self.wrote(path);

        let entropies: Vec<f64> = sweep.iter().map(|s| s.entropy).collect();
        let path = self.export.path(&format!("ENTROPIA_{suffix}.dat"))?;
        let format = PlotFormat {
            x_start,
            ..PlotFormat::default()
        };
        save(&path, |w| write_plot_real(w, &entropies, format))?;
        self.wrote(path);
        Ok(())
    }

    fn wrote(&mut self, path: PathBuf) {
        log::info!("Wrote {}", path.display());
        self.report.written.push(path);
    }
}
