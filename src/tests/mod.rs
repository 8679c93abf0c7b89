mod coc;
mod dice;
mod expr;
mod roll;
