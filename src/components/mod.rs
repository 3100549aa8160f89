pub mod game_list;
