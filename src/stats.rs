use std::time::Instant;

/// Tracks throughput between reports, reporting at most every 500ms
pub struct SimpleRecord {
    generation: u64,
    population: usize,
    gens_in_report: usize,
    last_report: Instant,
}
impl SimpleRecord {
    pub fn new(generation: u64, population: usize) -> Self {
        Self {
            generation,
            population,
            gens_in_report: 0,
            last_report: Instant::now(),
        }
    }

    pub fn record(&mut self, generation: u64, population: usize) {
        // a reset (clear/randomize) moves the generation backwards and isn't a step
        if generation > self.generation {
            self.gens_in_report += (generation - self.generation) as usize;
        }
        self.generation = generation;
        self.population = population;
    }

    pub fn has_report(&self) -> bool {
        self.last_report.elapsed().as_millis() >= 500
    }
    pub fn report(&mut self) -> String {
        let gens_per_sec = self.gens_in_report as f64 / self.last_report.elapsed().as_secs_f64();
        // reset stats for next report
        self.last_report = Instant::now();
        self.gens_in_report = 0;

        format!(
            "{:.02}gen/s generation:{} population:{}",
            gens_per_sec, self.generation, self.population
        )
    }
}
