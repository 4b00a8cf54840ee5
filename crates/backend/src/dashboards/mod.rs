pub mod d100_kpi_summary;
