use pheno_model::PhenotypeStats;
use pheno_report::stats_table;

pub fn print_stats(stats: &PhenotypeStats, bridge_mappings: usize) {
    println!("{}", stats_table(stats, bridge_mappings));
    println!(
        "\nAvailable phenotypes: {}",
        stats.phenotype_list.join(", ")
    );
}
